//! In-memory roster storage

use super::csv_format::{member_from_record, member_to_record, validate_headers, REQUIRED_COLUMNS};
use super::keywords::{KeywordExtractor, SkillTokens};
use super::{RosterError, RosterResult};
use crate::member::{Member, MemberId};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a CSV import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Rows without an email address
    pub skipped: usize,
}

/// Admin edit of a member; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub membership_category: Option<String>,
    pub job_position: Option<String>,
    pub affiliation_organization: Option<String>,
    pub skills: Option<String>,
    pub tags: Option<String>,
    pub years_experience_ia: Option<u32>,
    pub years_experience_healthcare: Option<u32>,
    pub community_involvement: Option<String>,
    pub suggestions: Option<String>,
    pub consent: Option<String>,
    pub profile_photo: Option<String>,
}

impl MemberUpdate {
    fn apply(self, member: &mut Member) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut member.first_name, self.first_name);
        set(&mut member.last_name, self.last_name);
        set(&mut member.email, self.email);
        if let Some(linkedin) = self.linkedin {
            member.linkedin = (!linkedin.trim().is_empty()).then_some(linkedin);
        }
        if self.registration_date.is_some() {
            member.registration_date = self.registration_date;
        }
        set(&mut member.membership_category, self.membership_category);
        set(&mut member.job_position, self.job_position);
        set(&mut member.affiliation_organization, self.affiliation_organization);
        set(&mut member.skills, self.skills);
        set(&mut member.tags, self.tags);
        if self.years_experience_ia.is_some() {
            member.years_experience_ia = self.years_experience_ia;
        }
        if self.years_experience_healthcare.is_some() {
            member.years_experience_healthcare = self.years_experience_healthcare;
        }
        set(&mut member.community_involvement, self.community_involvement);
        set(&mut member.suggestions, self.suggestions);
        set(&mut member.consent, self.consent);
        set(&mut member.profile_photo, self.profile_photo);
    }
}

/// Member table keyed by id, in insertion order
///
/// Clones share the keyword extractor.
#[derive(Clone)]
pub struct Roster {
    members: IndexMap<MemberId, Member>,
    next_id: u64,
    extractor: Arc<dyn KeywordExtractor>,
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("members", &self.members.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::with_extractor(SkillTokens)
    }

    pub fn with_extractor(extractor: impl KeywordExtractor + 'static) -> Self {
        Self {
            members: IndexMap::new(),
            next_id: 1,
            extractor: Arc::new(extractor),
        }
    }

    /// Load a roster from a CSV file on disk
    pub fn from_csv_path(path: impl AsRef<Path>) -> RosterResult<Self> {
        let path = path.as_ref();
        let mut roster = Self::new();
        let report = roster.import_csv(File::open(path)?)?;
        info!(path = %path.display(), added = report.added, "roster loaded");
        Ok(roster)
    }

    /// Keywords the configured extractor finds in a skills text
    pub fn keywords(&self, skills: &str) -> Vec<String> {
        self.extractor.keywords(skills)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// All members, in insertion order
    pub fn list(&self) -> Vec<Member> {
        self.members.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Emails compare case-insensitively
    pub fn find_by_email(&self, email: &str) -> Option<&Member> {
        let email = email.trim();
        self.members
            .values()
            .find(|m| m.email.eq_ignore_ascii_case(email))
    }

    /// Add a member under a fresh id; blank tags are derived from skills
    pub fn insert(&mut self, mut member: Member) -> MemberId {
        let id = MemberId::new(self.next_id);
        self.next_id += 1;

        member.user_id = id;
        if member.tags.trim().is_empty() {
            member.tags = self.extractor.tags(&member.skills);
        }
        self.members.insert(id, member);
        id
    }

    /// Apply an admin edit
    ///
    /// Changing the skills without supplying tags re-derives the tags.
    pub fn update(&mut self, id: MemberId, update: MemberUpdate) -> RosterResult<&Member> {
        if let Some(email) = update.email.as_deref() {
            if let Some(other) = self.find_by_email(email) {
                if other.user_id != id {
                    return Err(RosterError::DuplicateEmail(email.to_string()));
                }
            }
        }

        let rederive = update.skills.is_some() && update.tags.is_none();
        let member = self
            .members
            .get_mut(&id)
            .ok_or(RosterError::MemberNotFound(id))?;

        update.apply(member);
        if rederive {
            member.tags = self.extractor.tags(&member.skills);
        }
        debug!(%id, "member updated");
        Ok(member)
    }

    pub fn remove(&mut self, id: MemberId) -> RosterResult<Member> {
        // shift_remove keeps the remaining members in order
        self.members
            .shift_remove(&id)
            .ok_or(RosterError::MemberNotFound(id))
    }

    /// Upsert the rows of a community sheet export, matching on email
    ///
    /// The header row is validated before any row is read, so a rejected
    /// file leaves the roster untouched.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> RosterResult<ImportReport> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        validate_headers(reader.headers()?)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(member_from_record(&record?));
        }

        let mut report = ImportReport::default();
        for (line, incoming) in rows.into_iter().enumerate() {
            if incoming.email.is_empty() {
                warn!(row = line + 1, "skipping row without email");
                report.skipped += 1;
                continue;
            }

            let existing = self.find_by_email(&incoming.email).map(|m| m.user_id);
            match existing {
                Some(id) => {
                    if self.merge(id, incoming) {
                        report.updated += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                None => {
                    self.insert(incoming);
                    report.added += 1;
                }
            }
        }

        info!(
            added = report.added,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            "csv imported"
        );
        Ok(report)
    }

    /// Replace an existing member's sheet fields; returns whether anything changed
    fn merge(&mut self, id: MemberId, mut incoming: Member) -> bool {
        let Some(current) = self.members.get(&id) else {
            return false;
        };

        incoming.user_id = id;
        incoming.tags = if incoming.skills == current.skills {
            current.tags.clone()
        } else {
            self.extractor.tags(&incoming.skills)
        };

        if incoming == *current {
            return false;
        }
        self.members.insert(id, incoming);
        true
    }

    /// Write the header row and one row per member
    pub fn export_csv<W: Write>(&self, writer: W) -> RosterResult<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(REQUIRED_COLUMNS)?;
        for member in self.members.values() {
            writer.write_record(member_to_record(member))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> RosterResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.export_csv(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&str]) -> String {
        let mut csv = REQUIRED_COLUMNS.join(",");
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    const ANA: &str = "03/05/2024 10:00:00,Ana,Tremblay,ana@example.org,Chercheur,Professeure,\"Mila, CHUM\",\"Vision, NLP\",5,10,,,Oui,,";
    const BOB: &str = "03/06/2024 10:00:00,Bob,Roy,bob@example.org,Clinicien,Médecin,CHUM,Imagerie,2,15,,,Oui,,";

    #[test]
    fn test_import_assigns_sequential_ids() {
        let mut roster = Roster::new();
        let report = roster.import_csv(sheet(&[ANA, BOB]).as_bytes()).unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(roster.len(), 2);
        let ids: Vec<u64> = roster.iter().map(|m| m.user_id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(roster.get(MemberId::new(1)).unwrap().tags, "Vision, NLP");
    }

    #[test]
    fn test_reimport_upserts_by_email() {
        let mut roster = Roster::new();
        roster.import_csv(sheet(&[ANA, BOB]).as_bytes()).unwrap();

        let changed_bob = BOB.replace("Imagerie", "Imagerie, Radiologie");
        let carl = "03/07/2024 10:00:00,Carl,Roy,CARL@example.org,Étudiant,,IVADO,,,,,,Oui,,";
        let report = roster
            .import_csv(sheet(&[ANA, &changed_bob, carl]).as_bytes())
            .unwrap();

        assert_eq!(
            report,
            ImportReport { added: 1, updated: 1, unchanged: 1, skipped: 0 }
        );
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get(MemberId::new(2)).unwrap().tags, "Imagerie, Radiologie");
        assert!(roster.find_by_email("carl@example.org").is_some());
    }

    #[test]
    fn test_rejected_headers_leave_roster_untouched() {
        let mut roster = Roster::new();
        roster.import_csv(sheet(&[ANA]).as_bytes()).unwrap();

        let err = roster.import_csv("Prénom,Nom\nX,Y\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::MissingColumns(_)));
        assert!(err.is_invalid_input());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_rows_without_email_are_skipped() {
        let mut roster = Roster::new();
        let row = ",Nobody,,,,,,,,,,,,,";
        let report = roster.import_csv(sheet(&[row, ANA]).as_bytes()).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.added, 1);
    }

    #[test]
    fn test_bad_date_and_years_become_none() {
        let mut roster = Roster::new();
        let row = "hier,Ana,Tremblay,ana@example.org,,,,,beaucoup,3,,,,,";
        roster.import_csv(sheet(&[row]).as_bytes()).unwrap();

        let ana = roster.get(MemberId::new(1)).unwrap();
        assert_eq!(ana.registration_date, None);
        assert_eq!(ana.years_experience_ia, None);
        assert_eq!(ana.years_experience_healthcare, Some(3));
    }

    #[test]
    fn test_update_rederives_tags() {
        let mut roster = Roster::new();
        roster.import_csv(sheet(&[ANA]).as_bytes()).unwrap();
        let id = MemberId::new(1);

        let update = MemberUpdate {
            skills: Some("Robotique et IA".into()),
            years_experience_ia: Some(7),
            ..Default::default()
        };
        let ana = roster.update(id, update).unwrap();
        assert_eq!(ana.tags, "Robotique, IA");
        assert_eq!(ana.years_experience_ia, Some(7));
        assert_eq!(ana.first_name, "Ana");
    }

    #[test]
    fn test_update_rejects_taken_email() {
        let mut roster = Roster::new();
        roster.import_csv(sheet(&[ANA, BOB]).as_bytes()).unwrap();

        let update = MemberUpdate {
            email: Some("Ana@Example.org".into()),
            ..Default::default()
        };
        assert!(matches!(
            roster.update(MemberId::new(2), update),
            Err(RosterError::DuplicateEmail(_))
        ));
    }

    #[test]
    fn test_update_and_remove_unknown_member() {
        let mut roster = Roster::new();
        assert!(matches!(
            roster.update(MemberId::new(9), MemberUpdate::default()),
            Err(RosterError::MemberNotFound(_))
        ));
        assert!(matches!(
            roster.remove(MemberId::new(9)),
            Err(RosterError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_remove_keeps_order_and_ids() {
        let mut roster = Roster::new();
        let a = roster.insert(Member::new(0, "A", "A", "a@x.org"));
        let b = roster.insert(Member::new(0, "B", "B", "b@x.org"));
        let c = roster.insert(Member::new(0, "C", "C", "c@x.org"));

        roster.remove(b).unwrap();
        let ids: Vec<MemberId> = roster.iter().map(|m| m.user_id).collect();
        assert_eq!(ids, vec![a, c]);

        let d = roster.insert(Member::new(0, "D", "D", "d@x.org"));
        assert_eq!(d.as_u64(), 4);
    }

    #[test]
    fn test_export_then_import_is_unchanged() {
        let mut roster = Roster::new();
        roster.import_csv(sheet(&[ANA, BOB]).as_bytes()).unwrap();

        let bytes = roster.to_csv_bytes().unwrap();
        let report = roster.import_csv(bytes.as_slice()).unwrap();
        assert_eq!(report.unchanged, 2);
        assert_eq!(report.updated, 0);
    }

    #[test]
    fn test_from_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("membres.csv");
        std::fs::write(&path, sheet(&[ANA])).unwrap();

        let roster = Roster::from_csv_path(&path).unwrap();
        assert_eq!(roster.len(), 1);
    }

    struct Upper;

    impl KeywordExtractor for Upper {
        fn keywords(&self, skills: &str) -> Vec<String> {
            SkillTokens.keywords(skills).iter().map(|k| k.to_uppercase()).collect()
        }
    }

    #[test]
    fn test_keywords_use_configured_extractor() {
        let mut roster = Roster::with_extractor(Upper);
        roster.import_csv(sheet(&[ANA]).as_bytes()).unwrap();

        assert_eq!(roster.get(MemberId::new(1)).unwrap().tags, "VISION, NLP");
        assert_eq!(roster.keywords("Vision et NLP"), vec!["VISION", "NLP"]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut roster = Roster::new();
        roster.import_csv(sheet(&[ANA, BOB]).as_bytes()).unwrap();

        let mut staged = roster.clone();
        staged.remove(MemberId::new(2)).unwrap();
        assert_eq!(staged.len(), 1);
        assert_eq!(roster.len(), 2);
    }
}
