//! Family member domain model.
//!
//! # Responsibility
//! - Define the canonical member record shared by every family view.
//! - Own the derived head predicate and persisted-state invariants.
//!
//! # Invariants
//! - `id` is stable and unique within one owner's collection.
//! - `name` is non-empty after trim.
//! - `death_date` is set when `is_deceased`, and not earlier than `birth_date`.
//! - `parent_id`/`spouse_id` are plain references; they may dangle.

use crate::model::relation::{RelationSet, HEAD};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a member record.
pub type MemberId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Validation failures for member records and drafts.
///
/// `Display` output is meant for the user and always names the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    NilId,
    MissingName,
    MissingBirthDate,
    InvalidDate { field: &'static str, value: String },
    InvalidGender(String),
    MissingDeathDate,
    DeathBeforeBirth { birth: NaiveDate, death: NaiveDate },
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::MissingName => write!(f, "name is required"),
            Self::MissingBirthDate => write!(f, "birth_date is required"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} `{value}` is not a valid date (expected YYYY-MM-DD)")
            }
            Self::InvalidGender(value) => {
                write!(f, "gender `{value}` is not supported; expected male|female")
            }
            Self::MissingDeathDate => write!(f, "death_date is required for a deceased member"),
            Self::DeathBeforeBirth { birth, death } => write!(
                f,
                "death_date ({death}) must not be earlier than birth_date ({birth})"
            ),
        }
    }
}

impl Error for MemberValidationError {}

/// Canonical member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub is_deceased: bool,
    /// Meaningful only when `is_deceased`.
    pub death_date: Option<NaiveDate>,
    /// Label set; `"head,father"` on the wire.
    pub relation: RelationSet,
    pub parent_id: Option<MemberId>,
    pub spouse_id: Option<MemberId>,
    /// Canonical head flag, reconciled with the `head` label on ingestion.
    pub is_head: bool,
    pub profession: Option<String>,
    pub residence: Option<String>,
    pub hometown: Option<String>,
    pub ethnic: Option<String>,
    pub nationality: Option<String>,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub marriage_date: Option<NaiveDate>,
}

impl Member {
    /// Creates a living member with a generated id and no relations.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), name, birth_date)
    }

    /// Creates a member with a caller-provided id.
    ///
    /// Used by store reads and tests where identity already exists.
    pub fn with_id(id: MemberId, name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            gender: Gender::default(),
            birth_date,
            is_deceased: false,
            death_date: None,
            relation: RelationSet::default(),
            parent_id: None,
            spouse_id: None,
            is_head: false,
            profession: None,
            residence: None,
            hometown: None,
            ethnic: None,
            nationality: None,
            note: None,
            photo_url: None,
            marriage_date: None,
        }
    }

    /// Whether this member roots a family grouping.
    ///
    /// Either signal suffices, so records that skipped ingestion still group
    /// correctly.
    pub fn is_family_head(&self) -> bool {
        self.is_head || self.relation.contains(HEAD)
    }

    /// Aligns `is_head` and the `head` label.
    ///
    /// An explicit flag without the label gains the label; afterwards
    /// `is_head == relation.contains("head")`.
    pub fn reconcile_head(&mut self) {
        if self.is_head {
            self.relation.insert(HEAD);
        }
        self.is_head = self.relation.contains(HEAD);
    }

    /// Checks persisted-state invariants.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.id.is_nil() {
            return Err(MemberValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::MissingName);
        }
        if self.is_deceased {
            let death = self.death_date.ok_or(MemberValidationError::MissingDeathDate)?;
            if death < self.birth_date {
                return Err(MemberValidationError::DeathBeforeBirth {
                    birth: self.birth_date,
                    death,
                });
            }
        }
        Ok(())
    }
}
