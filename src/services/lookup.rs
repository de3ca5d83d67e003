use sqlx::SqlitePool;
use tracing::error;

use crate::models::SelectOption;
use crate::repository;

/// Parent entity whose live records feed a form's selection control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Category,
    Course,
}

/// Live parent records as `{id, name}` pairs, ordered by name.
///
/// Data-access failures are logged and yield an empty list so the form can
/// still render.
pub async fn options(db: &SqlitePool, source: LookupSource) -> Vec<SelectOption> {
    let result = match source {
        LookupSource::Category => repository::fetch_category_options(db).await,
        LookupSource::Course => repository::fetch_course_options(db).await,
    };

    match result {
        Ok(options) => options,
        Err(e) => {
            error!("failed to load {:?} options: {}", source, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::models::CourseForm;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    async fn test_options_skip_deleted_records() {
        let pool = setup_test_db().await;

        let design = repository::insert_category(&pool, "Design").await.unwrap();
        let archived = repository::insert_category(&pool, "Archived").await.unwrap();
        repository::soft_delete_category(&pool, &archived.id).await.unwrap();

        let options = options(&pool, LookupSource::Category).await;
        assert_eq!(
            options,
            vec![SelectOption {
                id: design.id.clone(),
                name: "Design".to_string()
            }]
        );

        let form = CourseForm {
            category_id: design.id,
            name: "Rust Basics".to_string(),
            status: "active".to_string(),
            ..Default::default()
        };
        let course = repository::insert_course(&pool, &form, None).await.unwrap();
        let gone = repository::insert_course(&pool, &form, None).await.unwrap();
        repository::soft_delete_course(&pool, &gone.id).await.unwrap();

        let options = super::options(&pool, LookupSource::Course).await;
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, course.id);
    }

    #[tokio::test]
    async fn test_options_empty_on_failure() {
        let pool = setup_test_db().await;
        repository::insert_category(&pool, "Design").await.unwrap();
        pool.close().await;

        assert!(options(&pool, LookupSource::Category).await.is_empty());
        assert!(options(&pool, LookupSource::Course).await.is_empty());
    }
}
