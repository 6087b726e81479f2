//! Owner scope of a member collection.
//!
//! # Invariants
//! - Account ids are trimmed and never empty.
//! - `Sample` maps to rows without an owner.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Whose members a session loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerScope {
    /// Authenticated identity.
    Account(String),
    /// Signed-out session showing the shared sample family.
    Sample,
}

impl OwnerScope {
    /// Maps the identity supplied by authentication.
    ///
    /// `None` or a blank id selects the sample scope.
    pub fn from_identity(owner_id: Option<&str>) -> Self {
        match owner_id.map(str::trim) {
            Some(id) if !id.is_empty() => Self::Account(id.to_string()),
            _ => Self::Sample,
        }
    }

    /// Column value stored in `family_members.owner_id`.
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Self::Account(id) => Some(id.as_str()),
            Self::Sample => None,
        }
    }
}

impl Display for OwnerScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account(_) => write!(f, "account"),
            Self::Sample => write!(f, "sample"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OwnerScope;

    #[test]
    fn blank_identity_selects_sample_scope() {
        assert_eq!(OwnerScope::from_identity(None), OwnerScope::Sample);
        assert_eq!(OwnerScope::from_identity(Some("  ")), OwnerScope::Sample);
        assert_eq!(
            OwnerScope::from_identity(Some(" user-1 ")),
            OwnerScope::Account("user-1".to_string())
        );
    }
}
