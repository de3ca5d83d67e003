pub mod flash;
pub mod form;
pub mod resource;

use axum::extract::DefaultBodyLimit;
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::resources::{CourseResource, TopicResource};
use crate::state::AppState;

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(resource::routes::<CourseResource>())
        .merge(resource::routes::<TopicResource>())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
