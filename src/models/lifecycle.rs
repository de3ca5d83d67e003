use serde::{Deserialize, Serialize};

/// Soft-delete state of a record.
///
/// Stored next to `deleted_at`; the table CHECK constraints keep the two in
/// step, so a row is `live` exactly when `deleted_at` is NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Lifecycle {
    Live,
    Deleted,
}

impl Lifecycle {
    pub fn is_live(self) -> bool {
        self == Lifecycle::Live
    }
}
