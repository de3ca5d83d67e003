use sqlx::SqlitePool;

use crate::services::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub uploads: UploadStore,
}
