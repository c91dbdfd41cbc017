//! Error types for calgrid.

use thiserror::Error;

/// Reasons a draft (or a recurrence rule) is rejected.
///
/// These are expected and recoverable: the caller keeps the dialog open
/// and asks the user to fix the form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Event title must not be empty")]
    EmptyTitle,

    #[error("No date range selected")]
    MissingRange,

    #[error("Repeat interval must be a positive whole number")]
    InvalidInterval,

    #[error("Weekly repeat needs at least one weekday")]
    NoWeekdays,

    #[error("Repeat end date is before the event starts")]
    UntilBeforeStart,
}

/// Errors that can occur in calgrid operations.
#[derive(Error, Debug)]
pub enum CalGridError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calgrid operations.
pub type CalGridResult<T> = Result<T, CalGridError>;
