use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// Payload failed schema validation or a business rule.
    #[error("{0}")]
    Validation(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("insufficient stock at location {location_id}: {available} available, {requested} requested")]
    InsufficientStock {
        location_id: i32,
        available: i32,
        requested: i32,
    },
    /// The hosted completion API failed or is not configured.
    #[error("consultant unavailable: {0}")]
    Consultant(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<validator::ValidationErrors> for InventoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
