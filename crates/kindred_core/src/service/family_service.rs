//! Family use-case service.
//!
//! # Responsibility
//! - Validate editor drafts before they reach the member store.
//! - Return a fresh full snapshot after every successful mutation.
//! - Seed the ownerless sample family for signed-out sessions.
//!
//! # Invariants
//! - A rejected draft never triggers a store call.
//! - Snapshots are replaced wholesale; callers keep their previous snapshot
//!   when a mutation fails.
//! - Log lines carry ids and counts only, never names or notes.

use crate::model::draft::MemberDraft;
use crate::model::member::{Gender, Member, MemberId, MemberValidationError};
use crate::model::owner::OwnerScope;
use crate::projection::family::{project, FamilyProjection};
use crate::repo::member_repo::{MemberRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for family use-cases.
#[derive(Debug)]
pub enum FamilyServiceError {
    /// Draft failed validation; nothing was saved.
    Validation(MemberValidationError),
    /// Target member does not exist.
    MemberNotFound(MemberId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for FamilyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent family state: {details}")
            }
        }
    }
}

impl Error for FamilyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemberValidationError> for FamilyServiceError {
    fn from(value: MemberValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for FamilyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::MemberNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Disposable view of one owner's members, in store fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySnapshot {
    pub scope: OwnerScope,
    pub members: Vec<Member>,
}

impl FamilySnapshot {
    /// Recomputes the role-based groupings from this snapshot.
    pub fn projection(&self) -> FamilyProjection<'_> {
        project(&self.members)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }
}

/// Outcome of a save: the stored member plus the refreshed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub member: Member,
    pub snapshot: FamilySnapshot,
}

/// Family service facade over a member repository.
pub struct FamilyService<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> FamilyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the full member list of one scope.
    pub fn load_snapshot(&self, scope: &OwnerScope) -> Result<FamilySnapshot, FamilyServiceError> {
        let members = self.repo.list_members(scope)?;
        info!(
            "event=family_load module=service status=ok scope={} members={}",
            scope,
            members.len()
        );
        Ok(FamilySnapshot {
            scope: scope.clone(),
            members,
        })
    }

    /// Validates and saves a draft, then reloads the scope.
    ///
    /// # Contract
    /// - `draft.id == None` inserts; the store assigns the id.
    /// - `draft.id == Some(id)` overwrites every field of that member; an id
    ///   outside `scope` fails with `MemberNotFound` and writes nothing.
    /// - Validation failure returns before any store call.
    pub fn save_member(
        &self,
        scope: &OwnerScope,
        draft: &MemberDraft,
    ) -> Result<SaveOutcome, FamilyServiceError> {
        let member = match draft.validate() {
            Ok(member) => member,
            Err(err) => {
                warn!(
                    "event=member_save module=service status=rejected scope={} error_code=validation_failed error={}",
                    scope, err
                );
                return Err(err.into());
            }
        };

        let stored = match draft.id {
            Some(_) => self.repo.update_member(scope, &member)?,
            None => self.repo.insert_member(scope, &member)?,
        };
        info!(
            "event=member_save module=service status=ok scope={} mode={} member_id={}",
            scope,
            if draft.id.is_some() { "update" } else { "insert" },
            stored.id
        );

        let snapshot = self.load_snapshot(scope)?;
        if snapshot.member(stored.id).is_none() {
            return Err(FamilyServiceError::InconsistentState(
                "saved member missing from refreshed snapshot",
            ));
        }

        Ok(SaveOutcome {
            member: stored,
            snapshot,
        })
    }

    /// Deletes one member by id, then reloads the scope.
    ///
    /// References held by other members are left dangling. Members of other
    /// scopes are reported as `MemberNotFound`.
    pub fn delete_member(
        &self,
        scope: &OwnerScope,
        id: MemberId,
    ) -> Result<FamilySnapshot, FamilyServiceError> {
        self.repo.delete_member(scope, id)?;
        info!(
            "event=member_delete module=service status=ok scope={} member_id={}",
            scope, id
        );
        self.load_snapshot(scope)
    }

    /// Seeds the sample family when the sample scope is empty.
    ///
    /// The batch is written atomically, so a failed seed leaves the scope
    /// empty and the next call retries. Returns the number of inserted
    /// members (`0` when already seeded).
    pub fn ensure_sample_family(&self) -> Result<usize, FamilyServiceError> {
        let scope = OwnerScope::Sample;
        if self.repo.count_members(&scope)? > 0 {
            return Ok(0);
        }

        let seeded = self.repo.seed_members(&scope, &sample_family()?)?;
        info!(
            "event=sample_seed module=service status=ok members={}",
            seeded.len()
        );
        Ok(seeded.len())
    }
}

/// Three generations of the Hale family, linked by client-side ids.
fn sample_family() -> Result<Vec<Member>, MemberValidationError> {
    let grandfather =
        sample_draft("Arthur Hale", Gender::Male, "1931-03-14", "father", None).validate()?;

    let mut grandmother = sample_draft(
        "Margaret Hale",
        Gender::Female,
        "1934-07-02",
        "mother,spouse",
        None,
    );
    grandmother.spouse_id = Some(grandfather.id);
    grandmother.is_deceased = true;
    grandmother.death_date = Some("2015-11-20".to_string());
    let grandmother = grandmother.validate()?;

    let mut head = sample_draft(
        "Thomas Hale",
        Gender::Male,
        "1962-05-09",
        "head,son",
        Some(grandfather.id),
    );
    head.profession = Some("Carpenter".to_string());
    head.residence = Some("Portland".to_string());
    let head = head.validate()?;

    let mut wife = sample_draft("Elena Hale", Gender::Female, "1965-10-30", "spouse", None);
    wife.spouse_id = Some(head.id);
    wife.marriage_date = Some("1988-06-18".to_string());
    let wife = wife.validate()?;

    let son = sample_draft("Lucas Hale", Gender::Male, "1990-01-12", "son", Some(head.id))
        .validate()?;
    let daughter = sample_draft(
        "Sofia Hale",
        Gender::Female,
        "1993-08-25",
        "daughter",
        Some(head.id),
    )
    .validate()?;

    Ok(vec![grandfather, grandmother, head, wife, son, daughter])
}

fn sample_draft(
    name: &str,
    gender: Gender,
    birth_date: &str,
    relation: &str,
    parent_id: Option<MemberId>,
) -> MemberDraft {
    let mut draft = MemberDraft::new(name, birth_date);
    draft.gender = Some(gender);
    draft.relation = Some(relation.to_string());
    draft.parent_id = parent_id;
    draft
}
