//! Error types for the planner_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a generation request was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputKind {
    /// No subjects were supplied
    #[error("at least one subject is required")]
    EmptySubjects,
    /// A subject name was empty or whitespace
    #[error("subject names must not be blank")]
    BlankSubjectName,
    /// The exam date could not be understood as a calendar date
    #[error("a valid exam date (YYYY-MM-DD) is required")]
    BadDate,
    /// Hours per day outside `(0, 24]`
    #[error("hours per day must be greater than 0 and at most 24")]
    BadHours,
    /// The exam date is not after today
    #[error("exam date must be in the future")]
    PastExamDate,
    /// Every subject weighs zero, so hours cannot be shared out
    #[error("total subject weight is zero")]
    DivisionByZero,
}

/// Core error type for planner_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generation input was rejected
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputKind),

    /// A subject/topic address did not exist in the plan
    #[error("No topic at subject {subject_index}, topic {topic_index}")]
    IndexOutOfRange {
        subject_index: usize,
        topic_index: usize,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Plan store error
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
