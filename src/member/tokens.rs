//! Delimited multi-value fields
//!
//! Profile fields such as the affiliation organization or the tags are free
//! text holding several values, separated either by commas or by the French
//! conjunction "et" ("CHUM et Mila, IVADO").

use regex::Regex;
use std::sync::OnceLock;

fn delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new(r"(?i),|\s+et\s+").expect("delimiter pattern is valid"))
}

/// Split a delimited field into trimmed, non-empty tokens
pub fn split_tokens(field: &str) -> Vec<&str> {
    delimiter()
        .split(field)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Case-insensitive membership test against a field's tokens
pub fn contains_token_ignore_case(field: &str, wanted: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    split_tokens(field)
        .into_iter()
        .any(|token| token.to_lowercase() == wanted)
}

/// Exact (trimmed, case-sensitive) membership test against a field's tokens
pub fn contains_token_exact(field: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    !wanted.is_empty() && split_tokens(field).into_iter().any(|token| token == wanted)
}
