use thiserror::Error;

use crate::EmployeeId;

pub type HrResult<T> = Result<T, HrError>;

/// Failures surfaced by employee operations. `Display` is the exact message
/// returned to HTTP clients.
#[derive(Debug, Error)]
pub enum HrError {
    #[error("Invalid employee ID")]
    InvalidId(String),
    #[error("Invalid request payload")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("Employee not found")]
    NotFound(EmployeeId),
}

impl HrError {
    /// Malformed input, as opposed to a missing record.
    pub fn is_malformed(&self) -> bool {
        matches!(self, HrError::InvalidId(_) | HrError::InvalidPayload(_))
    }
}
