//! Directory member records
//!
//! A member is created and updated by the directory service; clients only
//! read it, except for the admin edit path which round-trips whole records.

pub mod tokens;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use tokens::{contains_token_exact, contains_token_ignore_case, split_tokens};

/// Identity of a directory member as issued by the directory service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    pub fn new(id: u64) -> Self {
        MemberId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        MemberId(id)
    }
}

/// Delimited profile fields usable as filter dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberField {
    MembershipCategory,
    AffiliationOrganization,
    JobPosition,
    Tags,
}

/// A member of the community of practice
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Member {
    #[serde(alias = "userId")]
    pub user_id: MemberId,

    #[serde(alias = "firstName")]
    pub first_name: String,

    #[serde(alias = "lastName")]
    pub last_name: String,

    pub email: String,

    #[serde(default, deserialize_with = "de::blank_as_none")]
    pub linkedin: Option<String>,

    #[serde(default, alias = "registrationDate", deserialize_with = "de::lenient_date")]
    pub registration_date: Option<NaiveDate>,

    /// Member-type set ("Chercheur, Étudiant")
    #[serde(default, alias = "membershipCategory", deserialize_with = "de::null_as_empty")]
    pub membership_category: String,

    #[serde(default, alias = "jobPosition", deserialize_with = "de::null_as_empty")]
    pub job_position: String,

    #[serde(default, alias = "affiliationOrganization", deserialize_with = "de::null_as_empty")]
    pub affiliation_organization: String,

    /// Free-text expertise as written by the member
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub skills: String,

    /// Expertise keywords derived from `skills`
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub tags: String,

    #[serde(default, alias = "yearsExperienceIa", deserialize_with = "de::lenient_years")]
    pub years_experience_ia: Option<u32>,

    #[serde(default, alias = "yearsExperienceHealthcare", deserialize_with = "de::lenient_years")]
    pub years_experience_healthcare: Option<u32>,

    #[serde(default, alias = "communityInvolvement", deserialize_with = "de::null_as_empty")]
    pub community_involvement: String,

    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub suggestions: String,

    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub consent: String,

    #[serde(default, alias = "profilePhoto", deserialize_with = "de::null_as_empty")]
    pub profile_photo: String,
}

impl Member {
    pub fn new(
        user_id: impl Into<MemberId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// "First Last", used for expert node labels
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Raw text of a delimited field
    pub fn field(&self, field: MemberField) -> &str {
        match field {
            MemberField::MembershipCategory => &self.membership_category,
            MemberField::AffiliationOrganization => &self.affiliation_organization,
            MemberField::JobPosition => &self.job_position,
            MemberField::Tags => &self.tags,
        }
    }

    /// Trimmed tokens of a delimited field
    pub fn tokens(&self, field: MemberField) -> Vec<&str> {
        split_tokens(self.field(field))
    }

    pub fn organizations(&self) -> Vec<&str> {
        self.tokens(MemberField::AffiliationOrganization)
    }

    pub fn member_types(&self) -> Vec<&str> {
        self.tokens(MemberField::MembershipCategory)
    }

    pub fn tag_list(&self) -> Vec<&str> {
        self.tokens(MemberField::Tags)
    }
}

mod de {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};

    pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
    }

    /// The directory service stores experience as a float column
    pub fn lenient_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(value
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0).round() as u32))
    }

    /// Accepts ISO dates and the RFC 2822 timestamps some JSON encoders emit
    pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.date_naive()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_record() {
        let json = r#"{
            "user_id": 57,
            "first_name": "Ana",
            "last_name": "Tremblay",
            "email": "ana@example.org",
            "linkedin": "",
            "registration_date": "Tue, 05 Mar 2024 00:00:00 GMT",
            "membership_category": "Chercheur",
            "job_position": null,
            "affiliation_organization": "Mila et CHUM",
            "skills": "imagerie médicale",
            "tags": "imagerie, vision",
            "years_experience_ia": 5.0,
            "years_experience_healthcare": null,
            "community_involvement": null,
            "suggestions": null,
            "consent": "Oui",
            "profile_photo": null
        }"#;

        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.user_id, MemberId::new(57));
        assert_eq!(member.linkedin, None);
        assert_eq!(member.registration_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(member.job_position, "");
        assert_eq!(member.organizations(), vec!["Mila", "CHUM"]);
        assert_eq!(member.years_experience_ia, Some(5));
        assert_eq!(member.years_experience_healthcare, None);
    }

    #[test]
    fn test_deserialize_camel_case_aliases() {
        let json = r#"{
            "userId": 3,
            "firstName": "Luc",
            "lastName": "Roy",
            "email": "luc@example.org",
            "membershipCategory": "Étudiant",
            "yearsExperienceIa": 2
        }"#;

        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.user_id.as_u64(), 3);
        assert_eq!(member.member_types(), vec!["Étudiant"]);
        assert_eq!(member.years_experience_ia, Some(2));
        assert!(member.tags.is_empty());
    }

    #[test]
    fn test_full_name_trims() {
        let member = Member::new(1, " Ana ", "Tremblay ", "ana@example.org");
        assert_eq!(member.full_name(), "Ana Tremblay");
    }

    #[test]
    fn test_field_accessor() {
        let mut member = Member::new(1, "Ana", "Tremblay", "ana@example.org");
        member.tags = "vision, NLP".to_string();
        assert_eq!(member.field(MemberField::Tags), "vision, NLP");
        assert_eq!(member.tag_list(), vec!["vision", "NLP"]);
    }
}
