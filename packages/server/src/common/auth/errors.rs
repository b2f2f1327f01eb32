use thiserror::Error;

/// Precondition failures raised before a mutation reaches storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// No (or an empty) viewer identity on a write
    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Validation(String),
}

impl GuardError {
    pub fn required(field: &str) -> Self {
        GuardError::Validation(format!("{} is required", field))
    }
}
