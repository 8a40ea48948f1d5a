//! Member filtering
//!
//! Two independent entry points act on the member list: criteria filtering
//! and the free-text name search. They are deliberately not combined.

use super::criteria::FilterCriteria;
use crate::member::{contains_token_exact, contains_token_ignore_case, Member, MemberField};
use std::collections::BTreeMap;

/// Keep the members satisfying every active criterion
///
/// `None` returns the input unchanged. Within one criterion a single
/// matching value is enough; across criteria all must match. Relative order
/// is preserved.
pub fn filter_members(members: &[Member], criteria: Option<&FilterCriteria>) -> Vec<Member> {
    let Some(criteria) = criteria else {
        return members.to_vec();
    };

    let criteria = criteria.normalized();
    members
        .iter()
        .filter(|member| matches(member, &criteria))
        .cloned()
        .collect()
}

/// Whether a member satisfies already-normalized criteria
pub fn matches(member: &Member, criteria: &FilterCriteria) -> bool {
    let organization_ok = criteria.organizations.is_empty()
        || criteria
            .organizations
            .iter()
            .any(|o| contains_token_ignore_case(&member.affiliation_organization, o));

    let member_type_ok = criteria.member_types.is_empty()
        || criteria
            .member_types
            .iter()
            .any(|t| contains_token_exact(&member.membership_category, t));

    let tag_ok = criteria.tags.is_empty()
        || criteria
            .tags
            .iter()
            .any(|t| contains_token_ignore_case(&member.tags, t));

    let ai_ok = !criteria.ai_experience.is_active()
        || criteria.ai_experience.contains(member.years_experience_ia);

    let health_ok = !criteria.health_experience.is_active()
        || criteria.health_experience.contains(member.years_experience_healthcare);

    organization_ok && member_type_ok && tag_ok && ai_ok && health_ok
}

/// Case-insensitive substring search on first or last name
///
/// A blank query keeps everyone.
pub fn filter_by_name(members: &[Member], query: &str) -> Vec<Member> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return members.to_vec();
    }

    members
        .iter()
        .filter(|m| {
            m.first_name.to_lowercase().contains(&query) || m.last_name.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Distinct tokens of a delimited field across members, for the pickers
///
/// Tokens differing only in case collapse to the first spelling seen; the
/// result is sorted case-insensitively.
pub fn distinct_options(members: &[Member], field: MemberField) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for member in members {
        for token in member.tokens(field) {
            seen.entry(token.to_lowercase())
                .or_insert_with(|| token.to_string());
        }
    }
    seen.into_values().collect()
}
