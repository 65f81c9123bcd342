//! Validation errors shared by every skillmap crate

use thiserror::Error;

/// Errors raised while validating skill data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    /// A skill level outside the `MIN_LEVEL..=MAX_LEVEL` range
    #[error("Invalid skill level {level}: expected a value between 1 and 5")]
    InvalidLevel {
        /// The rejected level
        level: u8,
    },

    /// A category index past the end of the taxonomy
    #[error("Category index {index} out of range (taxonomy has {count} categories)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of categories
        count: usize,
    },

    /// The taxonomy definition cannot index skill vectors
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    /// A group name the taxonomy does not define
    #[error("Unknown category group '{0}'")]
    UnknownGroup(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;
