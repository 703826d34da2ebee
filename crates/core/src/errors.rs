use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Capacity error: {0}")]
    Capacity(String),

    #[error("Slot is full: {0}")]
    SlotFull(String),

    #[error("Duplicate booking: {0}")]
    DuplicateBooking(String),

    #[error("Slot is inactive: {0}")]
    InactiveSlot(String),

    #[error("No-op: {0}")]
    NoOp(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type LabResult<T> = Result<T, LabError>;
