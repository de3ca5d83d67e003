use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Resource, StoredFiles, UploadSlot};
use crate::api::form::FormSubmission;
use crate::models::{Course, CourseForm, Lifecycle};
use crate::repository;
use crate::services::LookupSource;
use crate::services::upload::IMAGE_POLICY;

pub struct CourseResource;

#[async_trait]
impl Resource for CourseResource {
    type Record = Course;
    type Form = CourseForm;

    const PATH: &'static str = "/Course";
    const NAME: &'static str = "course";
    const LOOKUP: LookupSource = LookupSource::Category;
    const UPLOADS: &'static [UploadSlot] = &[UploadSlot {
        field: "photo",
        policy: IMAGE_POLICY,
        required_on_add: false,
    }];

    fn parse_form(submission: &FormSubmission) -> CourseForm {
        CourseForm {
            id: submission.optional("id"),
            category_id: submission.text("category_id").trim().to_string(),
            name: submission.text("name").trim().to_string(),
            description: submission.optional("description"),
            avatar: None,
            status: submission.text("status"),
            start_date: submission.optional("start_date"),
            end_date: submission.optional("end_date"),
        }
    }

    fn lifecycle(record: &Course) -> Lifecycle {
        record.lifecycle
    }

    async fn list(db: &SqlitePool, _search: Option<&str>) -> Result<Vec<Course>, sqlx::Error> {
        repository::fetch_courses(db).await
    }

    async fn find(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
        repository::find_course_by_id(db, id).await
    }

    async fn insert(
        db: &SqlitePool,
        form: &CourseForm,
        files: &StoredFiles,
    ) -> Result<Course, sqlx::Error> {
        repository::insert_course(db, form, files.get("photo")).await
    }

    async fn update(
        db: &SqlitePool,
        id: &str,
        form: &CourseForm,
        files: &StoredFiles,
    ) -> Result<Option<Course>, sqlx::Error> {
        repository::update_course(db, id, form, files.get("photo")).await
    }

    async fn soft_delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        repository::soft_delete_course(db, id).await
    }
}
