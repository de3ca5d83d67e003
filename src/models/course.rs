use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Lifecycle;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub lifecycle: Lifecycle,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Course fields as submitted from (and rendered into) the add/update form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CourseForm {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Please choose a category."))]
    pub category_id: String,
    #[validate(length(min = 1, message = "Please enter the course name."))]
    pub name: String,
    pub description: Option<String>,
    /// Currently stored photo; informational only, never read from a submission.
    pub avatar: Option<String>,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<Course> for CourseForm {
    fn from(course: Course) -> Self {
        Self {
            id: Some(course.id),
            category_id: course.category_id,
            name: course.name,
            description: course.description,
            avatar: course.avatar,
            status: course.status,
            start_date: course.start_date,
            end_date: course.end_date,
        }
    }
}
