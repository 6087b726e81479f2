//! Core domain logic for Kindred family trees.
//! This crate is the single source of truth for member invariants and the
//! family groupings derived from them.

pub mod db;
pub mod logging;
pub mod media;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use media::photo_store::{DirectoryPhotoStore, PhotoStore, PhotoStoreError, PhotoStoreResult};
pub use model::draft::MemberDraft;
pub use model::member::{Gender, Member, MemberId, MemberValidationError};
pub use model::owner::OwnerScope;
pub use model::relation::{RelationBadge, RelationSet};
pub use projection::family::{
    grandparents, head_families, immediate_family, project, search_members, Couple, Family,
    FamilyProjection, HeadFamily,
};
pub use repo::member_repo::{MemberRepository, RepoError, RepoResult, SqliteMemberRepository};
pub use service::family_service::{
    FamilyService, FamilyServiceError, FamilySnapshot, SaveOutcome,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
