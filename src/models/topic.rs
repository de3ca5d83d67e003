use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Lifecycle;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Topic {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub description: Option<String>,
    pub videos: Option<String>,
    pub documents: Option<String>,
    pub attach_file: Option<String>,
    pub status: String,
    pub lifecycle: Lifecycle,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TopicForm {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Please enter the course ID."))]
    pub course_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Free text, unrelated to the `file` upload.
    pub documents: Option<String>,
    #[validate(length(min = 1, message = "Please choose a status."))]
    pub status: String,
    pub videos: Option<String>,
    pub attach_file: Option<String>,
}

impl From<Topic> for TopicForm {
    fn from(topic: Topic) -> Self {
        Self {
            id: Some(topic.id),
            course_id: topic.course_id,
            name: topic.name,
            description: topic.description,
            documents: topic.documents,
            status: topic.status,
            videos: topic.videos,
            attach_file: topic.attach_file,
        }
    }
}
