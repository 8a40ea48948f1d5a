//! Member filter engine
//!
//! Pure functions over an in-memory member list:
//! - criteria filtering (organization, member type, tag, two experience ranges)
//! - the applied-filter chip summary
//! - an independent first/last name search

pub mod criteria;
pub mod engine;
pub mod summary;

use thiserror::Error;

pub use criteria::{ExperienceRange, FilterCriteria, ALL_OPTION, EXPERIENCE_MAX, EXPERIENCE_MIN};
pub use engine::{distinct_options, filter_by_name, filter_members, matches};
pub use summary::{summarize, AppliedFilters, ChipKind, FilterChip};

/// Errors raised while reading a `/filter` payload
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unsupported criteria: {0}")]
    UnsupportedCriteria(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Filter criteria must be a JSON object")]
    NotAnObject,
}

pub type FilterResult<T> = Result<T, FilterError>;
