use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Category, Course, CourseForm, Lifecycle, SelectOption, Topic, TopicForm};

const COURSE_COLUMNS: &str = "id, category_id, name, description, avatar, status, start_date, end_date, lifecycle, created_at, updated_at, deleted_at";

const TOPIC_COLUMNS: &str = "id, course_id, name, description, videos, documents, attach_file, status, lifecycle, created_at, updated_at, deleted_at";

pub async fn insert_category(db: &SqlitePool, name: &str) -> Result<Category, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO categories (id, name, lifecycle, deleted_at) VALUES (?, ?, ?, NULL)")
        .bind(&id)
        .bind(name)
        .bind(Lifecycle::Live)
        .execute(db)
        .await?;

    Ok(Category {
        id,
        name: name.to_string(),
        lifecycle: Lifecycle::Live,
        deleted_at: None,
    })
}

pub async fn soft_delete_category(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "UPDATE categories SET lifecycle = ?, deleted_at = ? WHERE id = ? AND lifecycle = ?",
    )
    .bind(Lifecycle::Deleted)
    .bind(&now)
    .bind(id)
    .bind(Lifecycle::Live)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

/// Every category, deleted ones included, for the admin tool.
pub async fn fetch_categories(db: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, lifecycle, deleted_at FROM categories ORDER BY name",
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_category_options(db: &SqlitePool) -> Result<Vec<SelectOption>, sqlx::Error> {
    sqlx::query_as::<_, SelectOption>(
        "SELECT id, name FROM categories WHERE lifecycle = ? ORDER BY name",
    )
    .bind(Lifecycle::Live)
    .fetch_all(db)
    .await
}

pub async fn fetch_course_options(db: &SqlitePool) -> Result<Vec<SelectOption>, sqlx::Error> {
    sqlx::query_as::<_, SelectOption>(
        "SELECT id, name FROM courses WHERE lifecycle = ? ORDER BY name",
    )
    .bind(Lifecycle::Live)
    .fetch_all(db)
    .await
}

/// Every course, deleted ones included, newest first.
pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_course(
    db: &SqlitePool,
    form: &CourseForm,
    avatar: Option<&str>,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, category_id, name, description, avatar, status, start_date, end_date,
            lifecycle, created_at, updated_at, deleted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
        "#,
    )
    .bind(&id)
    .bind(&form.category_id)
    .bind(&form.name)
    .bind(&form.description)
    .bind(avatar)
    .bind(&form.status)
    .bind(&form.start_date)
    .bind(&form.end_date)
    .bind(Lifecycle::Live)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        category_id: form.category_id.clone(),
        name: form.name.clone(),
        description: form.description.clone(),
        avatar: avatar.map(str::to_string),
        status: form.status.clone(),
        start_date: form.start_date.clone(),
        end_date: form.end_date.clone(),
        lifecycle: Lifecycle::Live,
        created_at: now.clone(),
        updated_at: now,
        deleted_at: None,
    })
}

/// Overwrites every mutable field of a live course. `avatar` replaces the
/// stored photo only when `Some`.
pub async fn update_course(
    db: &SqlitePool,
    id: &str,
    form: &CourseForm,
    avatar: Option<&str>,
) -> Result<Option<Course>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE courses
        SET category_id = ?,
            name = ?,
            description = ?,
            avatar = COALESCE(?, avatar),
            status = ?,
            start_date = ?,
            end_date = ?,
            updated_at = ?
        WHERE id = ? AND lifecycle = ?
        "#,
    )
    .bind(&form.category_id)
    .bind(&form.name)
    .bind(&form.description)
    .bind(avatar)
    .bind(&form.status)
    .bind(&form.start_date)
    .bind(&form.end_date)
    .bind(&now)
    .bind(id)
    .bind(Lifecycle::Live)
    .execute(db)
    .await?
    .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_course_by_id(db, id).await
}

pub async fn soft_delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET lifecycle = ?,
            deleted_at = ?,
            updated_at = ?
        WHERE id = ? AND lifecycle = ?
        "#,
    )
    .bind(Lifecycle::Deleted)
    .bind(&now)
    .bind(&now)
    .bind(id)
    .bind(Lifecycle::Live)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

/// Live topics, newest first. A non-empty `search` keeps topics whose name
/// or description contains it (case-sensitive).
pub async fn fetch_topics(db: &SqlitePool, search: Option<&str>) -> Result<Vec<Topic>, sqlx::Error> {
    match search.filter(|s| !s.is_empty()) {
        Some(needle) => {
            sqlx::query_as::<_, Topic>(&format!(
                r#"
                SELECT {TOPIC_COLUMNS} FROM topics
                WHERE lifecycle = ?
                  AND (instr(name, ?) > 0 OR instr(COALESCE(description, ''), ?) > 0)
                ORDER BY created_at DESC
                "#
            ))
            .bind(Lifecycle::Live)
            .bind(needle)
            .bind(needle)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, Topic>(&format!(
                "SELECT {TOPIC_COLUMNS} FROM topics WHERE lifecycle = ? ORDER BY created_at DESC"
            ))
            .bind(Lifecycle::Live)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn find_topic_by_id(db: &SqlitePool, id: &str) -> Result<Option<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_topic(
    db: &SqlitePool,
    form: &TopicForm,
    videos: Option<&str>,
    attach_file: Option<&str>,
) -> Result<Topic, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO topics
            (id, course_id, name, description, videos, documents, attach_file, status,
            lifecycle, created_at, updated_at, deleted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
        "#,
    )
    .bind(&id)
    .bind(&form.course_id)
    .bind(&form.name)
    .bind(&form.description)
    .bind(videos)
    .bind(&form.documents)
    .bind(attach_file)
    .bind(&form.status)
    .bind(Lifecycle::Live)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Topic {
        id,
        course_id: form.course_id.clone(),
        name: form.name.clone(),
        description: form.description.clone(),
        videos: videos.map(str::to_string),
        documents: form.documents.clone(),
        attach_file: attach_file.map(str::to_string),
        status: form.status.clone(),
        lifecycle: Lifecycle::Live,
        created_at: now.clone(),
        updated_at: now,
        deleted_at: None,
    })
}

pub async fn update_topic(
    db: &SqlitePool,
    id: &str,
    form: &TopicForm,
    videos: Option<&str>,
    attach_file: Option<&str>,
) -> Result<Option<Topic>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE topics
        SET course_id = ?,
            name = ?,
            description = ?,
            videos = COALESCE(?, videos),
            documents = ?,
            attach_file = COALESCE(?, attach_file),
            status = ?,
            updated_at = ?
        WHERE id = ? AND lifecycle = ?
        "#,
    )
    .bind(&form.course_id)
    .bind(&form.name)
    .bind(&form.description)
    .bind(videos)
    .bind(&form.documents)
    .bind(attach_file)
    .bind(&form.status)
    .bind(&now)
    .bind(id)
    .bind(Lifecycle::Live)
    .execute(db)
    .await?
    .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_topic_by_id(db, id).await
}

pub async fn soft_delete_topic(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE topics
        SET lifecycle = ?,
            deleted_at = ?,
            updated_at = ?
        WHERE id = ? AND lifecycle = ?
        "#,
    )
    .bind(Lifecycle::Deleted)
    .bind(&now)
    .bind(&now)
    .bind(id)
    .bind(Lifecycle::Live)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

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

    async fn seed_course(pool: &SqlitePool, avatar: Option<&str>) -> Course {
        let category = insert_category(pool, "Programming")
            .await
            .expect("Failed to insert category");
        let form = CourseForm {
            category_id: category.id,
            name: "Rust Basics".to_string(),
            description: Some("Ownership and borrowing".to_string()),
            status: "active".to_string(),
            start_date: Some("2026-01-10".to_string()),
            end_date: Some("2026-03-10".to_string()),
            ..Default::default()
        };
        insert_course(pool, &form, avatar)
            .await
            .expect("Failed to insert course")
    }

    fn topic_form(course_id: &str, name: &str, description: Option<&str>) -> TopicForm {
        TopicForm {
            course_id: course_id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            status: "active".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_category_soft_delete() {
        let pool = setup_test_db().await;
        let web = insert_category(&pool, "Web").await.unwrap();
        let data = insert_category(&pool, "Data").await.unwrap();

        assert!(soft_delete_category(&pool, &web.id).await.unwrap());
        assert!(!soft_delete_category(&pool, &web.id).await.unwrap());

        let all = fetch_categories(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, data.id);
        assert!(all[0].lifecycle.is_live());
        assert_eq!(all[1].lifecycle, Lifecycle::Deleted);
        assert!(all[1].deleted_at.is_some());

        let options = fetch_category_options(&pool).await.unwrap();
        assert_eq!(options, vec![SelectOption { id: data.id, name: "Data".to_string() }]);
    }

    #[tokio::test]
    async fn test_insert_and_fetch_course() {
        let pool = setup_test_db().await;
        let before = Utc::now();

        let course = seed_course(&pool, Some("abc-cover.png")).await;
        assert_eq!(course.name, "Rust Basics");
        assert_eq!(course.lifecycle, Lifecycle::Live);
        assert!(course.deleted_at.is_none());

        let created = chrono::DateTime::parse_from_rfc3339(&course.created_at).unwrap();
        assert!(created >= before);

        let courses = fetch_courses(&pool).await.expect("Failed to fetch courses");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, course.id);
        assert_eq!(courses[0].avatar.as_deref(), Some("abc-cover.png"));
    }

    #[tokio::test]
    async fn test_insert_course_requires_existing_category() {
        let pool = setup_test_db().await;
        let form = CourseForm {
            category_id: "missing".to_string(),
            name: "Orphan".to_string(),
            ..Default::default()
        };

        assert!(insert_course(&pool, &form, None).await.is_err());
        assert!(fetch_courses(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_course_keeps_avatar_without_new_file() {
        let pool = setup_test_db().await;
        let course = seed_course(&pool, Some("abc-cover.png")).await;

        let mut form = CourseForm::from(course.clone());
        form.name = "Rust Advanced".to_string();
        form.description = None;

        let updated = update_course(&pool, &course.id, &form, None)
            .await
            .expect("Failed to update course")
            .expect("Course not found");
        assert_eq!(updated.name, "Rust Advanced");
        assert_eq!(updated.description, None);
        assert_eq!(updated.avatar.as_deref(), Some("abc-cover.png"));

        let updated = update_course(&pool, &course.id, &form, Some("def-new.png"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.avatar.as_deref(), Some("def-new.png"));
    }

    #[tokio::test]
    async fn test_soft_delete_course() {
        let pool = setup_test_db().await;
        let course = seed_course(&pool, None).await;

        assert!(soft_delete_course(&pool, &course.id).await.unwrap());
        // already deleted
        assert!(!soft_delete_course(&pool, &course.id).await.unwrap());
        assert!(!soft_delete_course(&pool, "unknown").await.unwrap());

        let stored = find_course_by_id(&pool, &course.id).await.unwrap().unwrap();
        assert_eq!(stored.lifecycle, Lifecycle::Deleted);
        assert!(stored.deleted_at.is_some());

        // the course list is unfiltered
        assert_eq!(fetch_courses(&pool).await.unwrap().len(), 1);

        let form = CourseForm::from(stored);
        assert!(update_course(&pool, &course.id, &form, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_topics_search() {
        let pool = setup_test_db().await;
        let course = seed_course(&pool, None).await;

        let traits = insert_topic(&pool, &topic_form(&course.id, "Traits", Some("Shared behaviour")), None, None)
            .await
            .unwrap();
        let lifetimes = insert_topic(&pool, &topic_form(&course.id, "Lifetimes", Some("Borrow checker and traits")), None, None)
            .await
            .unwrap();
        let macros = insert_topic(&pool, &topic_form(&course.id, "Macros", None), None, None)
            .await
            .unwrap();

        let all = fetch_topics(&pool, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(fetch_topics(&pool, Some("")).await.unwrap().len(), 3);

        let mut found: Vec<String> = fetch_topics(&pool, Some("rait"))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        found.sort();
        let mut expected = vec![traits.id.clone(), lifetimes.id.clone()];
        expected.sort();
        assert_eq!(found, expected);

        // case-sensitive
        let found = fetch_topics(&pool, Some("Traits")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, traits.id);

        assert!(soft_delete_topic(&pool, &macros.id).await.unwrap());
        assert_eq!(fetch_topics(&pool, None).await.unwrap().len(), 2);
        assert!(fetch_topics(&pool, Some("Macros")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_topic_replaces_only_supplied_files() {
        let pool = setup_test_db().await;
        let course = seed_course(&pool, None).await;

        let topic = insert_topic(
            &pool,
            &topic_form(&course.id, "Traits", None),
            Some("a-photo.png"),
            Some("b-notes.doc"),
        )
        .await
        .unwrap();

        let mut form = TopicForm::from(topic.clone());
        form.documents = Some("chapter 10".to_string());
        let updated = update_topic(&pool, &topic.id, &form, None, Some("c-notes.doc"))
            .await
            .unwrap()
            .expect("Topic not found");

        assert_eq!(updated.videos.as_deref(), Some("a-photo.png"));
        assert_eq!(updated.attach_file.as_deref(), Some("c-notes.doc"));
        assert_eq!(updated.documents.as_deref(), Some("chapter 10"));

        assert!(update_topic(&pool, "unknown", &form, None, None).await.unwrap().is_none());
    }
}
