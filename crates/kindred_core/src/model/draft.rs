//! Editor input and the validation rules applied before storage.
//!
//! # Responsibility
//! - Carry raw form values as the shell collects them.
//! - Turn a draft into a canonical `Member` or reject it as a whole.
//!
//! # Invariants
//! - A rejected draft never yields a partially valid member.
//! - Blank optional text is stored as `None`, never as `""`.
//! - Relation defaults to `head` when blank.

use crate::model::member::{Gender, Member, MemberId, MemberValidationError};
use crate::model::relation::{RelationSet, HEAD};
use chrono::NaiveDate;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw member form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    /// `None` for a new member; the existing id when editing.
    pub id: Option<MemberId>,
    pub name: String,
    pub gender: Option<Gender>,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    pub is_deceased: bool,
    pub death_date: Option<String>,
    /// Comma-joined labels, e.g. `"head,father"`.
    pub relation: Option<String>,
    pub parent_id: Option<MemberId>,
    pub spouse_id: Option<MemberId>,
    pub is_head: bool,
    pub profession: Option<String>,
    pub residence: Option<String>,
    pub hometown: Option<String>,
    pub ethnic: Option<String>,
    pub nationality: Option<String>,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub marriage_date: Option<String>,
}

impl MemberDraft {
    /// Starts a draft with the two required fields.
    pub fn new(name: impl Into<String>, birth_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: birth_date.into(),
            ..Self::default()
        }
    }

    /// Validates and normalizes the draft.
    ///
    /// New drafts get a client-generated id; the store replaces it on insert.
    ///
    /// # Errors
    /// - Blank name, missing or unparseable birth date.
    /// - Deceased without a parseable death date, or death before birth.
    /// - Unparseable marriage date.
    pub fn validate(&self) -> Result<Member, MemberValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MemberValidationError::MissingName);
        }

        let birth_date = parse_required_date("birth_date", self.birth_date.as_str())
            .ok_or(MemberValidationError::MissingBirthDate)??;

        let death_date = if self.is_deceased {
            let raw = self.death_date.as_deref().unwrap_or_default();
            Some(
                parse_required_date("death_date", raw)
                    .ok_or(MemberValidationError::MissingDeathDate)??,
            )
        } else {
            None
        };

        let marriage_date = match self.marriage_date.as_deref() {
            Some(raw) => parse_required_date("marriage_date", raw).transpose()?,
            None => None,
        };

        let relation = match self.relation.as_deref().map(RelationSet::parse) {
            Some(set) if !set.is_empty() => set,
            _ => RelationSet::single(HEAD),
        };

        let mut member = Member::with_id(self.id.unwrap_or_else(Uuid::new_v4), name, birth_date);
        member.gender = self.gender.unwrap_or_default();
        member.is_deceased = self.is_deceased;
        member.death_date = death_date;
        member.relation = relation;
        member.parent_id = self.parent_id;
        member.spouse_id = self.spouse_id;
        member.is_head = self.is_head;
        member.profession = normalize_optional_text(self.profession.as_deref());
        member.residence = normalize_optional_text(self.residence.as_deref());
        member.hometown = normalize_optional_text(self.hometown.as_deref());
        member.ethnic = normalize_optional_text(self.ethnic.as_deref());
        member.nationality = normalize_optional_text(self.nationality.as_deref());
        member.note = normalize_optional_text(self.note.as_deref());
        member.photo_url = normalize_optional_text(self.photo_url.as_deref());
        member.marriage_date = marriage_date;
        member.reconcile_head();

        member.validate()?;
        Ok(member)
    }
}

impl From<&Member> for MemberDraft {
    fn from(member: &Member) -> Self {
        Self {
            id: Some(member.id),
            name: member.name.clone(),
            gender: Some(member.gender),
            birth_date: format_date(member.birth_date),
            is_deceased: member.is_deceased,
            death_date: member.death_date.map(format_date),
            relation: Some(member.relation.to_string()),
            parent_id: member.parent_id,
            spouse_id: member.spouse_id,
            is_head: member.is_head,
            profession: member.profession.clone(),
            residence: member.residence.clone(),
            hometown: member.hometown.clone(),
            ethnic: member.ethnic.clone(),
            nationality: member.nationality.clone(),
            note: member.note.clone(),
            photo_url: member.photo_url.clone(),
            marriage_date: member.marriage_date.map(format_date),
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// Returns `None` for blank input so callers can pick the "missing" error.
pub fn parse_required_date(
    field: &'static str,
    raw: &str,
) -> Option<Result<NaiveDate, MemberValidationError>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
            MemberValidationError::InvalidDate {
                field,
                value: trimmed.to_string(),
            }
        }),
    )
}

/// Formats a date in the persisted `YYYY-MM-DD` shape.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Trims optional text and maps blank values to `None`.
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
