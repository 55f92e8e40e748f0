//! Error types for the picker

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// A key mapping handed the buffer something other than 0-9
    #[error("Invalid digit: {0}")]
    InvalidDigit(u32),

    #[error("Not a digit: {0}")]
    InvalidKey(String),

    #[error("Failed to lock picker state: {0}")]
    StatePoisoned(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, PickerError>;
