//! Persistent-store collaborator. The farm manager only talks to the
//! [`RecordStore`] trait; the hosted REST tables and the local JSON
//! document are interchangeable behind it.

pub mod json_backend;
pub mod rest_backend;
pub mod rows;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::error_message::compose_message;

pub use json_backend::JsonStore;
pub use rest_backend::RestStore;
pub use rows::{DailyNoteRow, FlockRow, ProfilePatch, ProfileRow, Table, TransactionRow};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("store request timed out")]
    Timeout,
    /// Structured error body returned by the hosted store.
    #[error("{}", compose_message(.message, .details.as_deref(), .hint.as_deref(), .code.as_deref()))]
    Api {
        message: String,
        details: Option<String>,
        hint: Option<String>,
        code: Option<String>,
    },
    /// Any other failed response, described from its body.
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("{table} row not found: {key}")]
    NotFound { table: &'static str, key: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Table-level operations the farm needs. Listing calls filter by the
/// owner's email; dated tables come back newest first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_profile(&self, email: &str) -> StoreResult<Option<ProfileRow>>;
    /// Inserts or merges on the `email` key.
    async fn upsert_profile(&self, row: &ProfileRow) -> StoreResult<()>;
    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<()>;

    async fn list_flocks(&self, email: &str) -> StoreResult<Vec<FlockRow>>;
    async fn insert_flock(&self, row: &FlockRow) -> StoreResult<()>;
    async fn update_flock_quantity(&self, id: Uuid, quantity: u32) -> StoreResult<()>;
    async fn delete_flock(&self, id: Uuid) -> StoreResult<()>;

    async fn list_transactions(&self, email: &str) -> StoreResult<Vec<TransactionRow>>;
    async fn insert_transaction(&self, row: &TransactionRow) -> StoreResult<()>;
    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()>;

    async fn list_notes(&self, email: &str) -> StoreResult<Vec<DailyNoteRow>>;
    async fn insert_note(&self, row: &DailyNoteRow) -> StoreResult<()>;

    /// Short label for logs and `config show`.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_render_like_user_messages() {
        let err = StoreError::Api {
            message: "column \"qty\" does not exist".into(),
            details: None,
            hint: Some("Perhaps you meant \"quantity\"".into()),
            code: Some("42703".into()),
        };
        assert_eq!(
            err.to_string(),
            "column \"qty\" does not exist   [Dica: Perhaps you meant \"quantity\"] (Código: 42703)"
        );
    }
}
