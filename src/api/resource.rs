use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::api::flash::{self, FlashKind};
use crate::api::form::{FieldErrors, FormSubmission, UploadedFile};
use crate::error::AppError;
use crate::resources::{Resource, StoredFiles};
use crate::services::{UploadStore, lookup};
use crate::state::AppState;
use crate::views::{FormView, ListView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    Add,
    Update,
}

#[derive(Deserialize)]
pub struct ListQueryParams {
    #[serde(rename = "SearchString")]
    search_string: Option<String>,
}

pub fn routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(R::PATH, get(list::<R>))
        .route(&format!("{}/Add", R::PATH), get(add_form::<R>).post(add_submit::<R>))
        .route(&format!("{}/Update", R::PATH), post(update_submit::<R>))
        .route(
            &format!("{}/Update/{{id}}", R::PATH),
            get(update_form::<R>).post(update_submit_with_id::<R>),
        )
        .route(&format!("{}/Delete/{{id}}", R::PATH), get(delete::<R>))
}

async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<ListQueryParams>,
    jar: CookieJar,
) -> Response {
    let search = if R::SEARCHABLE {
        params.search_string.filter(|s| !s.is_empty())
    } else {
        None
    };

    let items = match R::list(&state.db, search.as_deref()).await {
        Ok(items) => items,
        Err(e) => return AppError::from(e).into_response(),
    };

    let (jar, flash) = flash::take(jar);
    (jar, ListView { items, search, flash }).into_response()
}

async fn add_form<R: Resource>(State(state): State<AppState>) -> FormView<R::Form> {
    FormView {
        form: R::Form::default(),
        options: lookup::options(&state.db, R::LOOKUP).await,
        errors: FieldErrors::default(),
    }
}

async fn add_submit<R: Resource>(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Response {
    let submission = match FormSubmission::from_multipart(multipart).await {
        Ok(submission) => submission,
        Err(e) => return e.into_response(),
    };

    let form = R::parse_form(&submission);
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(e),
    };
    let uploads = accept_uploads::<R>(&submission, FormMode::Add, &mut errors);

    if !errors.is_empty() {
        return invalid_form::<R>(&state, form, errors).await.into_response();
    }

    let ok = match create::<R>(&state, &form, &uploads).await {
        Ok(_) => {
            info!("{} created", R::NAME);
            true
        }
        Err(e) => {
            error!("failed to create {}: {}", R::NAME, e);
            false
        }
    };

    redirect_to_list::<R>(jar, FlashKind::Save, ok)
}

async fn update_form<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> FormView<R::Form> {
    let form = match R::find(&state.db, &id).await {
        Ok(Some(record)) => R::Form::from(record),
        Ok(None) => R::Form::default(),
        Err(e) => {
            error!("failed to load {} {}: {}", R::NAME, id, e);
            R::Form::default()
        }
    };

    FormView {
        form,
        options: lookup::options(&state.db, R::LOOKUP).await,
        errors: FieldErrors::default(),
    }
}

async fn update_submit<R: Resource>(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Response {
    apply_update::<R>(state, jar, None, multipart).await
}

async fn update_submit_with_id<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    multipart: Multipart,
) -> Response {
    apply_update::<R>(state, jar, Some(id), multipart).await
}

/// Field values overwrite the record as submitted; only upload policies are
/// checked here.
async fn apply_update<R: Resource>(
    state: AppState,
    jar: CookieJar,
    path_id: Option<String>,
    multipart: Multipart,
) -> Response {
    let mut submission = match FormSubmission::from_multipart(multipart).await {
        Ok(submission) => submission,
        Err(e) => return e.into_response(),
    };
    if let Some(id) = path_id {
        submission.set_field("id", id);
    }

    let form = R::parse_form(&submission);
    let mut errors = FieldErrors::default();
    let uploads = accept_uploads::<R>(&submission, FormMode::Update, &mut errors);

    if !errors.is_empty() {
        return invalid_form::<R>(&state, form, errors).await.into_response();
    }

    let id = submission.optional("id");
    let ok = match id {
        None => {
            warn!("{} update submitted without an id", R::NAME);
            false
        }
        Some(id) => match modify::<R>(&state, &id, &form, &uploads).await {
            Ok(true) => {
                info!("{} {} updated", R::NAME, id);
                true
            }
            Ok(false) => {
                warn!("{} {} not found for update", R::NAME, id);
                false
            }
            Err(e) => {
                error!("failed to update {} {}: {}", R::NAME, id, e);
                false
            }
        },
    };

    redirect_to_list::<R>(jar, FlashKind::Update, ok)
}

async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let ok = match R::soft_delete(&state.db, &id).await {
        Ok(true) => {
            info!("{} {} deleted", R::NAME, id);
            true
        }
        Ok(false) => {
            warn!("{} {} not found for delete", R::NAME, id);
            false
        }
        Err(e) => {
            error!("failed to delete {} {}: {}", R::NAME, id, e);
            false
        }
    };

    redirect_to_list::<R>(jar, FlashKind::Delete, ok)
}

/// Checks each upload slot against its policy, recording violations in
/// `errors`, and returns the files that passed.
fn accept_uploads<'a, R: Resource>(
    submission: &'a FormSubmission,
    mode: FormMode,
    errors: &mut FieldErrors,
) -> Vec<(&'static str, &'a UploadedFile)> {
    let mut accepted = Vec::new();

    for slot in R::UPLOADS {
        match submission.file(slot.field) {
            Some(file) => match slot.policy.check(&file.file_name, file.bytes.len()) {
                Ok(()) => accepted.push((slot.field, file)),
                Err(message) => errors.add(slot.field, message),
            },
            None if mode == FormMode::Add && slot.required_on_add => {
                errors.add(slot.field, "Please choose a file.");
            }
            None => {}
        }
    }

    accepted
}

async fn store_uploads(
    store: &UploadStore,
    uploads: &[(&'static str, &UploadedFile)],
) -> Result<StoredFiles, AppError> {
    let mut stored = StoredFiles::default();
    for &(field, file) in uploads {
        let name = store.store(&file.file_name, &file.bytes).await?;
        stored.insert(field, name);
    }
    Ok(stored)
}

async fn create<R: Resource>(
    state: &AppState,
    form: &R::Form,
    uploads: &[(&'static str, &UploadedFile)],
) -> Result<R::Record, AppError> {
    let files = store_uploads(&state.uploads, uploads).await?;
    Ok(R::insert(&state.db, form, &files).await?)
}

/// `Ok(false)` when there is no live record to update. Files are only
/// stored once the record is known to exist.
async fn modify<R: Resource>(
    state: &AppState,
    id: &str,
    form: &R::Form,
    uploads: &[(&'static str, &UploadedFile)],
) -> Result<bool, AppError> {
    match R::find(&state.db, id).await? {
        Some(record) if R::lifecycle(&record).is_live() => {}
        _ => return Ok(false),
    }

    let files = store_uploads(&state.uploads, uploads).await?;
    Ok(R::update(&state.db, id, form, &files).await?.is_some())
}

async fn invalid_form<R: Resource>(
    state: &AppState,
    form: R::Form,
    errors: FieldErrors,
) -> FormView<R::Form> {
    for (field, message) in errors.iter() {
        error!("{} form error on {}: {}", R::NAME, field, message);
    }

    FormView {
        form,
        options: lookup::options(&state.db, R::LOOKUP).await,
        errors,
    }
}

fn redirect_to_list<R: Resource>(jar: CookieJar, kind: FlashKind, ok: bool) -> Response {
    (flash::set(jar, kind, ok), Redirect::to(R::PATH)).into_response()
}
