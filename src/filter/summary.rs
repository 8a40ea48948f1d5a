//! Applied-filter chips
//!
//! The chip list summarizes active criteria for the user. When nothing is
//! active the summary is `None`, so "is any filter applied" is a single
//! nullity check.

use super::criteria::{ExperienceRange, FilterCriteria};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipKind {
    Organization,
    MemberType,
    Tag,
    AiExperience,
    HealthExperience,
}

/// One removable chip in the applied-filter bar
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterChip {
    pub kind: ChipKind,
    /// Selected value, or `"min-max"` for ranges
    pub value: String,
    pub label: String,
}

impl FilterChip {
    fn selection(kind: ChipKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            label: value.to_string(),
        }
    }

    fn range(kind: ChipKind, range: ExperienceRange) -> Self {
        let domain = match kind {
            ChipKind::AiExperience => "AI",
            _ => "healthcare",
        };
        Self {
            kind,
            value: format!("{}-{}", range.min, range.max),
            label: format!("{}-{} years of {} experience", range.min, range.max, domain),
        }
    }
}

/// Normalized criteria together with their chips
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub criteria: FilterCriteria,
    pub chips: Vec<FilterChip>,
}

/// Summarize criteria into chips, or `None` when nothing is active
pub fn summarize(criteria: &FilterCriteria) -> Option<AppliedFilters> {
    let criteria = criteria.normalized();
    let mut chips = Vec::new();

    chips.extend(
        criteria
            .organizations
            .iter()
            .map(|v| FilterChip::selection(ChipKind::Organization, v)),
    );
    chips.extend(
        criteria
            .member_types
            .iter()
            .map(|v| FilterChip::selection(ChipKind::MemberType, v)),
    );
    chips.extend(
        criteria
            .tags
            .iter()
            .map(|v| FilterChip::selection(ChipKind::Tag, v)),
    );
    if criteria.ai_experience.is_active() {
        chips.push(FilterChip::range(ChipKind::AiExperience, criteria.ai_experience));
    }
    if criteria.health_experience.is_active() {
        chips.push(FilterChip::range(ChipKind::HealthExperience, criteria.health_experience));
    }

    if chips.is_empty() {
        None
    } else {
        Some(AppliedFilters { criteria, chips })
    }
}

impl AppliedFilters {
    /// Drop one chip's constraint and re-summarize
    pub fn without(&self, chip: &FilterChip) -> Option<AppliedFilters> {
        let mut criteria = self.criteria.clone();
        match chip.kind {
            ChipKind::Organization => criteria.organizations.retain(|v| *v != chip.value),
            ChipKind::MemberType => criteria.member_types.retain(|v| *v != chip.value),
            ChipKind::Tag => criteria.tags.retain(|v| *v != chip.value),
            ChipKind::AiExperience => criteria.ai_experience = ExperienceRange::full(),
            ChipKind::HealthExperience => criteria.health_experience = ExperienceRange::full(),
        }
        summarize(&criteria)
    }
}
