//! Relation labels attached to a family member.
//!
//! # Responsibility
//! - Parse comma-joined relation text into a normalized label set.
//! - Answer "contains label X" queries used by grouping and display.
//!
//! # Invariants
//! - Labels are trimmed, lowercase and never empty.
//! - Labels are unique; first-seen order is kept for display.
//! - Membership checks compare whole labels, never substrings.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Label marking the root of a family grouping.
pub const HEAD: &str = "head";
pub const FATHER: &str = "father";
pub const MOTHER: &str = "mother";
pub const SON: &str = "son";
pub const DAUGHTER: &str = "daughter";
pub const SPOUSE: &str = "spouse";

/// Ordered, deduplicated set of relation labels.
///
/// Serialized as the comma-joined text form (`"head,father"`) to match the
/// persisted column shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RelationSet {
    labels: Vec<String>,
}

impl RelationSet {
    /// Parses comma-joined relation text.
    ///
    /// Blank segments are skipped, so `" Head, ,father "` yields
    /// `["head", "father"]`.
    pub fn parse(text: &str) -> Self {
        let mut set = Self::default();
        for segment in text.split(',') {
            set.insert(segment);
        }
        set
    }

    /// Builds a set holding one label.
    pub fn single(label: &str) -> Self {
        let mut set = Self::default();
        set.insert(label);
        set
    }

    /// Inserts one label; returns `false` when it was blank or present.
    pub fn insert(&mut self, label: &str) -> bool {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() || self.labels.contains(&normalized) {
            return false;
        }
        self.labels.push(normalized);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        self.labels.iter().any(|existing| *existing == needle)
    }

    pub fn contains_any(&self, labels: &[&str]) -> bool {
        labels.iter().any(|label| self.contains(label))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Display category picked by label precedence.
    pub fn badge(&self) -> RelationBadge {
        if self.contains(HEAD) {
            RelationBadge::Head
        } else if self.contains(SPOUSE) {
            RelationBadge::Spouse
        } else if self.contains_any(&[SON, DAUGHTER]) {
            RelationBadge::Child
        } else {
            RelationBadge::Other
        }
    }
}

impl Display for RelationSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labels.join(","))
    }
}

impl From<String> for RelationSet {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<RelationSet> for String {
    fn from(value: RelationSet) -> Self {
        value.to_string()
    }
}

/// Card styling bucket the shell maps to icon and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationBadge {
    /// Crown icon.
    Head,
    /// Heart icon.
    Spouse,
    /// Son or daughter.
    Child,
    Other,
}

impl RelationBadge {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Spouse => "spouse",
            Self::Child => "child",
            Self::Other => "other",
        }
    }
}
