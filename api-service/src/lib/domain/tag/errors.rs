use thiserror::Error;

/// Error for TagName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagNameError {
    #[error("Tag name cannot be empty")]
    Empty,

    #[error("Tag name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}
