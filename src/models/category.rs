use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Lifecycle;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub lifecycle: Lifecycle,
    pub deleted_at: Option<String>,
}

/// One entry of a selection control: the parent id and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}
