//! Expertise keyword extraction
//!
//! Member tags are derived from the free-text skills field. The extractor
//! sits behind a trait so a language-model backed implementation can be
//! plugged in by the service without touching the roster.

use crate::member::split_tokens;
use std::collections::HashSet;

/// Turns a member's free-text skills into tag keywords
pub trait KeywordExtractor: Send + Sync {
    fn keywords(&self, skills: &str) -> Vec<String>;

    /// Keywords joined the way the `tags` field stores them
    fn tags(&self, skills: &str) -> String {
        self.keywords(skills).join(", ")
    }
}

/// Tags are the skills field's own delimited tokens
///
/// Lines and semicolons also separate entries. Duplicates differing only in
/// case keep their first spelling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillTokens;

impl KeywordExtractor for SkillTokens {
    fn keywords(&self, skills: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        skills
            .split(['\n', ';'])
            .flat_map(split_tokens)
            .map(|token| token.trim_end_matches('.').trim())
            .filter(|token| !token.is_empty())
            .filter(|token| seen.insert(token.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}
