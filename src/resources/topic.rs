use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Resource, StoredFiles, UploadSlot};
use crate::api::form::FormSubmission;
use crate::models::{Lifecycle, Topic, TopicForm};
use crate::repository;
use crate::services::LookupSource;
use crate::services::upload::{ATTACHMENT_POLICY, IMAGE_POLICY};

pub struct TopicResource;

#[async_trait]
impl Resource for TopicResource {
    type Record = Topic;
    type Form = TopicForm;

    const PATH: &'static str = "/Topic";
    const NAME: &'static str = "topic";
    const LOOKUP: LookupSource = LookupSource::Course;
    // photo is stored in `videos`, file in `attach_file`
    const UPLOADS: &'static [UploadSlot] = &[
        UploadSlot {
            field: "photo",
            policy: IMAGE_POLICY,
            required_on_add: true,
        },
        UploadSlot {
            field: "file",
            policy: ATTACHMENT_POLICY,
            required_on_add: true,
        },
    ];
    const SEARCHABLE: bool = true;

    fn parse_form(submission: &FormSubmission) -> TopicForm {
        TopicForm {
            id: submission.optional("id"),
            course_id: submission.text("course_id").trim().to_string(),
            name: submission.text("name"),
            description: submission.optional("description"),
            documents: submission.optional("documents"),
            status: submission.text("status").trim().to_string(),
            videos: None,
            attach_file: None,
        }
    }

    fn lifecycle(record: &Topic) -> Lifecycle {
        record.lifecycle
    }

    async fn list(db: &SqlitePool, search: Option<&str>) -> Result<Vec<Topic>, sqlx::Error> {
        repository::fetch_topics(db, search).await
    }

    async fn find(db: &SqlitePool, id: &str) -> Result<Option<Topic>, sqlx::Error> {
        repository::find_topic_by_id(db, id).await
    }

    async fn insert(
        db: &SqlitePool,
        form: &TopicForm,
        files: &StoredFiles,
    ) -> Result<Topic, sqlx::Error> {
        repository::insert_topic(db, form, files.get("photo"), files.get("file")).await
    }

    async fn update(
        db: &SqlitePool,
        id: &str,
        form: &TopicForm,
        files: &StoredFiles,
    ) -> Result<Option<Topic>, sqlx::Error> {
        repository::update_topic(db, id, form, files.get("photo"), files.get("file")).await
    }

    async fn soft_delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        repository::soft_delete_topic(db, id).await
    }
}
