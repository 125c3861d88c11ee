//! Error types for the emotion engine.
//!
//! Two families, matching the two places scoring can go wrong:
//! - [`ConfigError`]: the rule tables are unusable. Fatal, raised once by
//!   [`EmotionEngine::new`](crate::EmotionEngine::new) before any record is seen.
//! - [`ScoreError`]: one record produced an unusable vector. Never escapes
//!   the batch driver; it becomes a fallback result instead.

use thiserror::Error;

/// Invalid or unreadable rule tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read rules file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Malformed rules: {0}")]
    Malformed(String),

    #[error("Mood catalog is empty")]
    EmptyCatalog,

    /// A mood is missing `weight`, `keywords` or `genres`
    #[error("Mood '{mood}' is missing required field '{field}'")]
    MissingField { mood: String, field: &'static str },

    #[error("Duplicate mood id '{0}'")]
    DuplicateMood(String),

    #[error("{context}: genre id {id} is not a positive integer")]
    InvalidGenreId { context: String, id: i64 },

    /// A table refers to a mood that is not in the catalog
    #[error("{context}: unknown mood '{mood}'")]
    UnknownMood { context: String, mood: String },

    #[error("Genre emotion table: unknown genre '{0}'")]
    UnknownGenre(String),

    #[error("Era weights for '{mood}': range {start}-{end} starts after it ends")]
    InvalidEraRange { mood: String, start: i32, end: i32 },

    #[error("Era weights for '{mood}': ranges {first:?} and {second:?} overlap")]
    OverlappingEraRanges {
        mood: String,
        first: (i32, i32),
        second: (i32, i32),
    },

    #[error("{context}: weight {value} is not finite")]
    NonFiniteWeight { context: String, value: f64 },
}

/// Failure while scoring a single record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("Raw score for mood '{mood}' is not finite ({value})")]
    NonFiniteScore { mood: String, value: f64 },

    #[error("Line {line} is not a valid movie record: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// Convenience alias for configuration results
pub type Result<T> = std::result::Result<T, ConfigError>;
