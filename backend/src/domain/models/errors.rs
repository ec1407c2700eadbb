use thiserror::Error;

/// Failure of a domain operation, classified by how the caller should react
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad or missing input; the caller must fix the request
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    /// The assignment gate refused because another driver claimed the booking first
    #[error("Booking {0} has already been accepted")]
    AlreadyAssigned(String),
    /// Connectivity, timeout or write failure in the store. Not retried.
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}
