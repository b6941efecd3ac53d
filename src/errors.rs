use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

use crate::advisory::AdvisoryError;
use crate::config::ConfigError;
use crate::core::services::ServiceError;
use crate::storage::StoreError;

/// Unified error type for the domain, controller, and collaborator layers.
#[derive(Debug, Error)]
pub enum FarmError {
    #[error("No farm session. Use `login <email>` first.")]
    NotLoggedIn,
    #[error("Flock not found: {0}")]
    FlockNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Advisory service is not configured")]
    AdvisoryUnavailable,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = StdResult<T, FarmError>;

impl From<ServiceError> for FarmError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Invalid(message) => FarmError::Validation(message),
            ServiceError::NotFound { what: "flock", key } => FarmError::FlockNotFound(key),
            ServiceError::NotFound { what: "catalog item", key } => {
                FarmError::CatalogItemNotFound(key)
            }
            ServiceError::NotFound { what: "transaction", key } => match Uuid::parse_str(&key) {
                Ok(id) => FarmError::TransactionNotFound(id),
                Err(_) => FarmError::Validation(format!("transaction not found: {key}")),
            },
            ServiceError::NotFound { what, key } => {
                FarmError::Validation(format!("{what} not found: {key}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_domain_variants() {
        let id = Uuid::new_v4();
        let err: FarmError = ServiceError::NotFound {
            what: "transaction",
            key: id.to_string(),
        }
        .into();
        assert!(matches!(err, FarmError::TransactionNotFound(found) if found == id));

        let err: FarmError = ServiceError::Invalid("eggs exceed birds".into()).into();
        assert!(matches!(err, FarmError::Validation(_)));
    }
}
