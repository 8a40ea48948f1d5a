//! Member roster
//!
//! The roster is the directory service's member table. It is filled from the
//! community sheet's CSV export and edited through the admin routes.

pub mod csv_format;
pub mod keywords;
pub mod store;

use crate::member::MemberId;
use thiserror::Error;

pub use csv_format::{validate_headers, REQUIRED_COLUMNS};
pub use keywords::{KeywordExtractor, SkillTokens};
pub use store::{ImportReport, MemberUpdate, Roster};

/// Roster errors
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Incorrect column order")]
    IncorrectColumnOrder,

    #[error("User not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RosterError {
    /// Errors caused by the uploaded file rather than by the roster
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            RosterError::MissingColumns(_) | RosterError::IncorrectColumnOrder | RosterError::Csv(_)
        )
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
