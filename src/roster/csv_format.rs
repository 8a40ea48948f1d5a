//! Community sheet CSV layout
//!
//! The roster is exchanged as the CSV export of the registration form. Its
//! header row is fixed, in French, and must appear in exactly this order.

use super::{RosterError, RosterResult};
use crate::member::Member;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::warn;

/// Required header row, in order
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "Date d'inscription",
    "Prénom",
    "Nom",
    "Adresse courriel",
    "Catégorie de membres",
    "Titre d'emploi",
    "Organisation d'affiliation",
    "Compétences ou Expertise",
    "Nombre d'années d'expérience en IA",
    "Nombre d'années d'expérience en santé",
    "Impliquation dans la communauté",
    "Suggestions",
    "Consentement",
    "Photo de profil",
    "LinkedIn",
];

/// Timestamp format of the registration column
pub const REGISTRATION_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

mod col {
    pub const REGISTRATION_DATE: usize = 0;
    pub const FIRST_NAME: usize = 1;
    pub const LAST_NAME: usize = 2;
    pub const EMAIL: usize = 3;
    pub const MEMBERSHIP_CATEGORY: usize = 4;
    pub const JOB_POSITION: usize = 5;
    pub const AFFILIATION_ORGANIZATION: usize = 6;
    pub const SKILLS: usize = 7;
    pub const YEARS_EXPERIENCE_IA: usize = 8;
    pub const YEARS_EXPERIENCE_HEALTHCARE: usize = 9;
    pub const COMMUNITY_INVOLVEMENT: usize = 10;
    pub const SUGGESTIONS: usize = 11;
    pub const CONSENT: usize = 12;
    pub const PROFILE_PHOTO: usize = 13;
    pub const LINKEDIN: usize = 14;
}

/// Check the header row: every required column present, in order
pub fn validate_headers(headers: &StringRecord) -> RosterResult<()> {
    let present: Vec<&str> = headers.iter().map(str::trim).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.contains(required))
        .map(|required| required.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(RosterError::MissingColumns(missing));
    }

    if present != REQUIRED_COLUMNS {
        return Err(RosterError::IncorrectColumnOrder);
    }

    Ok(())
}

fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}

/// Registration timestamps that fail to parse are dropped
pub fn parse_registration_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDateTime::parse_from_str(raw, REGISTRATION_FORMAT) {
        Ok(dt) => Some(dt.date()),
        Err(e) => {
            warn!(value = raw, error = %e, "unparseable registration date");
            None
        }
    }
}

/// Years of experience; fractional values are rounded
pub fn parse_years(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v.max(0.0).round() as u32),
        _ => {
            warn!(value = raw, "unparseable years of experience");
            None
        }
    }
}

/// Build a member from one data row; id and tags are left for the roster
pub fn member_from_record(record: &StringRecord) -> Member {
    let linkedin = cell(record, col::LINKEDIN);

    Member {
        registration_date: parse_registration_date(&cell(record, col::REGISTRATION_DATE)),
        first_name: cell(record, col::FIRST_NAME),
        last_name: cell(record, col::LAST_NAME),
        email: cell(record, col::EMAIL),
        membership_category: cell(record, col::MEMBERSHIP_CATEGORY),
        job_position: cell(record, col::JOB_POSITION),
        affiliation_organization: cell(record, col::AFFILIATION_ORGANIZATION),
        skills: cell(record, col::SKILLS),
        years_experience_ia: parse_years(&cell(record, col::YEARS_EXPERIENCE_IA)),
        years_experience_healthcare: parse_years(&cell(record, col::YEARS_EXPERIENCE_HEALTHCARE)),
        community_involvement: cell(record, col::COMMUNITY_INVOLVEMENT),
        suggestions: cell(record, col::SUGGESTIONS),
        consent: cell(record, col::CONSENT),
        profile_photo: cell(record, col::PROFILE_PHOTO),
        linkedin: (!linkedin.is_empty()).then_some(linkedin),
        ..Default::default()
    }
}

/// One data row in `REQUIRED_COLUMNS` order
pub fn member_to_record(member: &Member) -> Vec<String> {
    let years = |v: Option<u32>| v.map(|y| y.to_string()).unwrap_or_default();

    vec![
        member
            .registration_date
            .map(|d| d.format("%m/%d/%Y 00:00:00").to_string())
            .unwrap_or_default(),
        member.first_name.clone(),
        member.last_name.clone(),
        member.email.clone(),
        member.membership_category.clone(),
        member.job_position.clone(),
        member.affiliation_organization.clone(),
        member.skills.clone(),
        years(member.years_experience_ia),
        years(member.years_experience_healthcare),
        member.community_involvement.clone(),
        member.suggestions.clone(),
        member.consent.clone(),
        member.profile_photo.clone(),
        member.linkedin.clone().unwrap_or_default(),
    ]
}
