//! Filter criteria
//!
//! Each criterion is independently toggleable. An empty selection or a range
//! equal to the full default span means "no constraint".

use super::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Lower bound of the experience sliders
pub const EXPERIENCE_MIN: u32 = 0;

/// Upper bound of the experience sliders
pub const EXPERIENCE_MAX: u32 = 50;

/// Picker entry that stands for "no constraint"
pub const ALL_OPTION: &str = "All";

/// Inclusive range of years of experience, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct ExperienceRange {
    pub min: u32,
    pub max: u32,
}

impl ExperienceRange {
    /// Bounds are reordered if given backwards
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn full() -> Self {
        Self {
            min: EXPERIENCE_MIN,
            max: EXPERIENCE_MAX,
        }
    }

    /// A range only constrains when it differs from the full default span
    pub fn is_active(&self) -> bool {
        *self != Self::full()
    }

    /// Members without a value never satisfy a range
    pub fn contains(&self, years: Option<u32>) -> bool {
        years.is_some_and(|y| self.min <= y && y <= self.max)
    }
}

impl Default for ExperienceRange {
    fn default() -> Self {
        Self::full()
    }
}

impl From<(u32, u32)> for ExperienceRange {
    fn from((min, max): (u32, u32)) -> Self {
        Self::new(min, max)
    }
}

impl From<ExperienceRange> for (u32, u32) {
    fn from(range: ExperienceRange) -> Self {
        (range.min, range.max)
    }
}

/// Criteria selected in the member filter panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Affiliation organizations, case-insensitive
    pub organizations: Vec<String>,
    /// Membership categories, exact
    pub member_types: Vec<String>,
    /// Expertise tags, case-insensitive
    pub tags: Vec<String>,
    pub ai_experience: ExperienceRange,
    pub health_experience: ExperienceRange,
}

/// Payload keys understood by the directory service's `/filter` route
pub mod payload_keys {
    pub const ORGANIZATION: &str = "affiliation_organization";
    pub const MEMBER_TYPE: &str = "membership_category";
    pub const TAGS: &str = "tags";
    pub const AI_EXPERIENCE: &str = "years_experience_ia";
    pub const HEALTH_EXPERIENCE: &str = "years_experience_healthcare";
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organizations<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organizations = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_member_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_types = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ai_experience(mut self, min: u32, max: u32) -> Self {
        self.ai_experience = ExperienceRange::new(min, max);
        self
    }

    pub fn with_health_experience(mut self, min: u32, max: u32) -> Self {
        self.health_experience = ExperienceRange::new(min, max);
        self
    }

    /// Drop blank entries and duplicates; a selection containing the
    /// `All` option is cleared entirely.
    ///
    /// Organizations and tags match case-insensitively, so their duplicates
    /// are found ignoring case and keep the first spelling.
    pub fn normalized(&self) -> Self {
        Self {
            organizations: normalize_selection(&self.organizations, false),
            member_types: normalize_selection(&self.member_types, true),
            tags: normalize_selection(&self.tags, false),
            ai_experience: self.ai_experience,
            health_experience: self.health_experience,
        }
    }

    /// True when, after normalization, no criterion constrains anything
    pub fn is_unconstrained(&self) -> bool {
        let n = self.normalized();
        n.organizations.is_empty()
            && n.member_types.is_empty()
            && n.tags.is_empty()
            && !n.ai_experience.is_active()
            && !n.health_experience.is_active()
    }

    /// Body for the directory service's `/filter` route
    ///
    /// Only active criteria are sent.
    pub fn to_query_payload(&self) -> Value {
        let n = self.normalized();
        let mut body = Map::new();

        if !n.organizations.is_empty() {
            body.insert(payload_keys::ORGANIZATION.into(), json!(n.organizations));
        }
        if !n.member_types.is_empty() {
            body.insert(payload_keys::MEMBER_TYPE.into(), json!(n.member_types));
        }
        if !n.tags.is_empty() {
            body.insert(payload_keys::TAGS.into(), json!(n.tags));
        }
        if n.ai_experience.is_active() {
            body.insert(payload_keys::AI_EXPERIENCE.into(), json!(n.ai_experience));
        }
        if n.health_experience.is_active() {
            body.insert(payload_keys::HEALTH_EXPERIENCE.into(), json!(n.health_experience));
        }

        Value::Object(body)
    }

    /// Parse a `/filter` body back into criteria
    pub fn from_query_payload(payload: &Value) -> FilterResult<Self> {
        let object = payload.as_object().ok_or(FilterError::NotAnObject)?;
        let mut criteria = FilterCriteria::default();

        for (key, value) in object {
            match key.as_str() {
                payload_keys::ORGANIZATION => criteria.organizations = string_list(key, value)?,
                payload_keys::MEMBER_TYPE => criteria.member_types = string_list(key, value)?,
                payload_keys::TAGS => criteria.tags = string_list(key, value)?,
                payload_keys::AI_EXPERIENCE => criteria.ai_experience = range(key, value)?,
                payload_keys::HEALTH_EXPERIENCE => criteria.health_experience = range(key, value)?,
                other => return Err(FilterError::UnsupportedCriteria(other.to_string())),
            }
        }

        Ok(criteria)
    }
}

fn normalize_selection(values: &[String], case_sensitive: bool) -> Vec<String> {
    if values.iter().any(|v| v.trim().eq_ignore_ascii_case(ALL_OPTION)) {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        let seen = out.iter().any(|v| {
            if case_sensitive {
                v == value
            } else {
                v.to_lowercase() == value.to_lowercase()
            }
        });
        if !value.is_empty() && !seen {
            out.push(value.to_string());
        }
    }
    out
}

fn string_list(key: &str, value: &Value) -> FilterResult<Vec<String>> {
    let items = value.as_array().ok_or_else(|| FilterError::InvalidValue {
        key: key.to_string(),
        reason: "expected an array of strings".to_string(),
    })?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| FilterError::InvalidValue {
                key: key.to_string(),
                reason: format!("expected a string, got {item}"),
            })
        })
        .collect()
}

fn range(key: &str, value: &Value) -> FilterResult<ExperienceRange> {
    let invalid = |reason: &str| FilterError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let bounds = value
        .as_array()
        .filter(|a| a.len() == 2)
        .ok_or_else(|| invalid("expected [min, max]"))?;

    let bound = |v: &Value| -> FilterResult<u32> {
        v.as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.max(0.0).round() as u32)
            .ok_or_else(|| invalid("bounds must be numbers"))
    };

    Ok(ExperienceRange::new(bound(&bounds[0])?, bound(&bounds[1])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconstrained() {
        assert!(FilterCriteria::default().is_unconstrained());
        assert!(!ExperienceRange::default().is_active());
    }

    #[test]
    fn test_range_reorders_bounds() {
        let range = ExperienceRange::new(20, 5);
        assert_eq!(range, ExperienceRange { min: 5, max: 20 });
        assert!(range.contains(Some(5)));
        assert!(range.contains(Some(20)));
        assert!(!range.contains(Some(21)));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_range_serializes_as_pair() {
        let range = ExperienceRange::new(2, 10);
        assert_eq!(serde_json::to_string(&range).unwrap(), "[2,10]");
        let back: ExperienceRange = serde_json::from_str("[10,2]").unwrap();
        assert_eq!(back, range);
    }

    #[test]
    fn test_all_option_clears_selection() {
        let criteria = FilterCriteria::new()
            .with_organizations(["Mila", "all"])
            .with_tags(["", "  vision ", "vision"]);
        let n = criteria.normalized();
        assert!(n.organizations.is_empty());
        assert_eq!(n.tags, vec!["vision"]);
    }

    #[test]
    fn test_duplicates_follow_matching_case_rules() {
        let criteria = FilterCriteria::new()
            .with_organizations(["Mila", "mila", " MILA "])
            .with_tags(["NLP", "nlp"])
            .with_member_types(["Chercheur", "chercheur"]);
        let n = criteria.normalized();
        assert_eq!(n.organizations, vec!["Mila"]);
        assert_eq!(n.tags, vec!["NLP"]);
        assert_eq!(n.member_types, vec!["Chercheur", "chercheur"]);
    }

    #[test]
    fn test_all_everywhere_is_unconstrained() {
        let criteria = FilterCriteria::new()
            .with_organizations([ALL_OPTION])
            .with_member_types([ALL_OPTION])
            .with_tags([ALL_OPTION]);
        assert!(criteria.is_unconstrained());
        assert_eq!(criteria.to_query_payload(), json!({}));
    }

    #[test]
    fn test_payload_contains_only_active_criteria() {
        let criteria = FilterCriteria::new()
            .with_organizations(["Mila"])
            .with_ai_experience(0, 10);
        assert_eq!(
            criteria.to_query_payload(),
            json!({
                "affiliation_organization": ["Mila"],
                "years_experience_ia": [0, 10]
            })
        );
    }

    #[test]
    fn test_payload_roundtrip() {
        let criteria = FilterCriteria::new()
            .with_member_types(["Chercheur"])
            .with_tags(["NLP"])
            .with_health_experience(3, 12);
        let parsed = FilterCriteria::from_query_payload(&criteria.to_query_payload()).unwrap();
        assert_eq!(parsed, criteria);
    }

    #[test]
    fn test_payload_accepts_float_bounds() {
        let parsed = FilterCriteria::from_query_payload(&json!({"years_experience_ia": [1.0, 4.6]})).unwrap();
        assert_eq!(parsed.ai_experience, ExperienceRange::new(1, 5));
    }

    #[test]
    fn test_payload_rejects_unknown_keys() {
        let err = FilterCriteria::from_query_payload(&json!({"salary": [1, 2]})).unwrap_err();
        assert_eq!(err, FilterError::UnsupportedCriteria("salary".to_string()));
    }

    #[test]
    fn test_payload_rejects_bad_shapes() {
        assert_eq!(
            FilterCriteria::from_query_payload(&json!([])).unwrap_err(),
            FilterError::NotAnObject
        );
        assert!(matches!(
            FilterCriteria::from_query_payload(&json!({"tags": "NLP"})),
            Err(FilterError::InvalidValue { .. })
        ));
        assert!(matches!(
            FilterCriteria::from_query_payload(&json!({"years_experience_ia": [1]})),
            Err(FilterError::InvalidValue { .. })
        ));
    }
}
