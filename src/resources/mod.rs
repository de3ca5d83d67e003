//! The entities exposed through the generic CRUD-with-upload handlers.

pub mod course;
pub mod topic;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::api::form::FormSubmission;
use crate::models::Lifecycle;
use crate::services::{LookupSource, UploadPolicy};

pub use course::CourseResource;
pub use topic::TopicResource;

/// A file input on a resource form.
#[derive(Debug, Clone, Copy)]
pub struct UploadSlot {
    pub field: &'static str,
    pub policy: UploadPolicy,
    /// Whether Add rejects a submission without this file. Update never does.
    pub required_on_add: bool,
}

/// Stored filenames produced by this request, keyed by upload field.
#[derive(Debug, Default)]
pub struct StoredFiles(HashMap<&'static str, String>);

impl StoredFiles {
    pub fn insert(&mut self, field: &'static str, stored_name: String) {
        self.0.insert(field, stored_name);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

/// What the generic handlers need to know about an entity.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Record: Serialize + Send + Sync + 'static;
    type Form: Serialize + Validate + Default + From<Self::Record> + Send + Sync + 'static;

    /// Route prefix, e.g. `/Course`.
    const PATH: &'static str;
    /// Lowercase name used in log lines.
    const NAME: &'static str;
    const LOOKUP: LookupSource;
    const UPLOADS: &'static [UploadSlot];
    /// Whether the list honours `?SearchString=`.
    const SEARCHABLE: bool = false;

    fn parse_form(submission: &FormSubmission) -> Self::Form;

    fn lifecycle(record: &Self::Record) -> Lifecycle;

    async fn list(db: &SqlitePool, search: Option<&str>) -> Result<Vec<Self::Record>, sqlx::Error>;

    async fn find(db: &SqlitePool, id: &str) -> Result<Option<Self::Record>, sqlx::Error>;

    async fn insert(
        db: &SqlitePool,
        form: &Self::Form,
        files: &StoredFiles,
    ) -> Result<Self::Record, sqlx::Error>;

    /// `None` when no live record has this id.
    async fn update(
        db: &SqlitePool,
        id: &str,
        form: &Self::Form,
        files: &StoredFiles,
    ) -> Result<Option<Self::Record>, sqlx::Error>;

    /// `false` when no live record has this id.
    async fn soft_delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error>;
}
