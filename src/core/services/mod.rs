//! Pure reducers over [`FarmState`](crate::ledger::FarmState). Nothing in
//! here performs I/O; the farm manager persists what these return.

pub mod category_service;
pub mod feed_service;
pub mod flock_service;
pub mod note_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use feed_service::FeedService;
pub use flock_service::{FlockForm, FlockService};
pub use note_service::NoteService;
pub use summary_service::{Dashboard, FinanceTotals, ProductionSummary, SummaryService};
pub use transaction_service::TransactionService;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },
}

impl ServiceError {
    pub(crate) fn not_found(what: &'static str, key: impl ToString) -> Self {
        ServiceError::NotFound {
            what,
            key: key.to_string(),
        }
    }
}
