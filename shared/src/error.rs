use thiserror::Error;

/// Errors surfaced by the remote document store boundary.
///
/// A rejected write carries the store's own message; nothing is retried and
/// no local rollback is needed because the local view was never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task not found")]
    NotFound,
    #[error("store rejected operation: {0}")]
    Rejected(String),
}

impl From<String> for StoreError {
    fn from(e: String) -> Self {
        // the task service reports a missing item with this exact string
        if e == "Task not found" {
            StoreError::NotFound
        } else {
            StoreError::Rejected(e)
        }
    }
}

/// Provider-side auth failure, carried to the caller as a human-readable
/// message. Non-fatal; the user retries manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Provider(String),
}
