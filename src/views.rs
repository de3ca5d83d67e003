//! View models handed to the presentation layer.
//!
//! Handlers assemble everything a page needs, selection options included,
//! into one of these values; rendering serializes it as JSON for the
//! template layer in front of the service.

use std::collections::BTreeMap;

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;

use crate::api::form::FieldErrors;
use crate::models::SelectOption;

#[derive(Debug, Serialize)]
pub struct ListView<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Status flags left by the previous write, keyed by operation name.
    pub flash: BTreeMap<&'static str, bool>,
}

#[derive(Debug, Serialize)]
pub struct FormView<F> {
    pub form: F,
    pub options: Vec<SelectOption>,
    pub errors: FieldErrors,
}

impl<T: Serialize> IntoResponse for ListView<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl<F: Serialize> IntoResponse for FormView<F> {
    fn into_response(self) -> Response {
        let status = if self.errors.is_empty() {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        (status, Json(self)).into_response()
    }
}
