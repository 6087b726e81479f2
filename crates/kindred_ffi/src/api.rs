//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level family functions to Dart via FRB.
//! - Flatten core types into plain string/bool envelopes for the shell.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutation response carries the refreshed snapshot on success, so
//!   the shell replaces its view wholesale.
//! - Failures leave the store untouched and return `ok=false` with a
//!   user-facing message.

use kindred_core::db::open_db;
use kindred_core::model::draft::format_date;
use kindred_core::{
    core_version as core_version_inner, grandparents, head_families,
    init_logging as init_logging_inner, ping as ping_inner, search_members, DirectoryPhotoStore,
    FamilyService, FamilySnapshot, Gender, Member, MemberDraft, MemberValidationError,
    OwnerScope, PhotoStore, SqliteMemberRepository,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "kindred_family.sqlite3";
const PHOTO_DIR_NAME: &str = "kindred_photos";
const DB_PATH_ENV: &str = "KINDRED_DB_PATH";
const PHOTO_DIR_ENV: &str = "KINDRED_PHOTO_DIR";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static PHOTO_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Member form values as collected by the editor.
///
/// Dates are `YYYY-MM-DD`; ids are UUID strings; blank strings mean absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberInput {
    /// `None` creates a member; `Some(id)` edits it.
    pub id: Option<String>,
    pub name: String,
    /// `male|female`; defaults to `male`.
    pub gender: Option<String>,
    pub birth_date: String,
    pub is_deceased: bool,
    pub death_date: Option<String>,
    /// Comma-joined labels; defaults to `head`.
    pub relation: Option<String>,
    pub parent_id: Option<String>,
    pub spouse_id: Option<String>,
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

/// Flattened member for card rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberView {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub birth_date: String,
    pub is_deceased: bool,
    pub death_date: Option<String>,
    pub relation: String,
    /// `head|spouse|child|other`, drives icon and color.
    pub badge: String,
    pub parent_id: Option<String>,
    pub spouse_id: Option<String>,
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

/// Couple as two member ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoupleView {
    pub first_id: String,
    pub second_id: String,
}

/// Parent id with child ids in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyView {
    pub parent_id: String,
    pub child_ids: Vec<String>,
}

/// Head card: head, optional spouse, child ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCardView {
    pub head_id: String,
    pub spouse_id: Option<String>,
    pub child_ids: Vec<String>,
}

/// Full snapshot plus its groupings, all referencing `members` by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilySnapshotView {
    pub members: Vec<MemberView>,
    pub head_ids: Vec<String>,
    pub couples: Vec<CoupleView>,
    pub families: Vec<FamilyView>,
    pub unaffiliated_ids: Vec<String>,
}

/// Envelope for snapshot loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySnapshotResponse {
    pub ok: bool,
    pub snapshot: FamilySnapshotView,
    pub message: String,
}

/// Envelope for save/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyActionResponse {
    pub ok: bool,
    /// Saved member id (store-assigned on insert) or deleted id.
    pub member_id: Option<String>,
    /// Refreshed snapshot; `None` on failure.
    pub snapshot: Option<FamilySnapshotView>,
    pub message: String,
}

impl FamilyActionResponse {
    fn success(message: impl Into<String>, member_id: String, snapshot: &FamilySnapshot) -> Self {
        Self {
            ok: true,
            member_id: Some(member_id),
            snapshot: Some(to_snapshot_view(snapshot)),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            member_id: None,
            snapshot: None,
            message: message.into(),
        }
    }
}

/// Envelope for member search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSearchResponse {
    pub ok: bool,
    pub items: Vec<MemberView>,
    pub message: String,
}

/// Envelope for head cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCardsResponse {
    pub ok: bool,
    pub items: Vec<HeadCardView>,
    pub message: String,
}

/// Envelope for grandparent cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrandparentsResponse {
    pub ok: bool,
    pub items: Vec<GrandparentView>,
    pub message: String,
}

/// Grandparent card: the parent and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrandparentView {
    pub member: MemberView,
    pub children: Vec<MemberView>,
}

/// Envelope for photo uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUploadResponse {
    pub ok: bool,
    pub url: Option<String>,
    pub message: String,
}

/// Loads the owner's members and their groupings.
///
/// `owner_id = None` (signed out) loads the sample family, seeding it on
/// first use.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn family_snapshot(owner_id: Option<String>) -> FamilySnapshotResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    match load_snapshot(&scope) {
        Ok(snapshot) => FamilySnapshotResponse {
            ok: true,
            message: format!("Loaded {} member(s).", snapshot.members.len()),
            snapshot: to_snapshot_view(&snapshot),
        },
        Err(err) => FamilySnapshotResponse {
            ok: false,
            snapshot: FamilySnapshotView::default(),
            message: format!("Failed to load family members: {err}"),
        },
    }
}

/// Creates or updates one member, then returns the refreshed snapshot.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Validation failures name the offending field and save nothing.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn family_save_member(owner_id: Option<String>, input: MemberInput) -> FamilyActionResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    let draft = match to_member_draft(input) {
        Ok(draft) => draft,
        Err(message) => return FamilyActionResponse::failure(message),
    };
    let is_update = draft.id.is_some();

    let result = with_family_service(|service| {
        service
            .save_member(&scope, &draft)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(outcome) => {
            let message = if is_update {
                format!("{} has been updated.", outcome.member.name)
            } else {
                format!("{} has been added to your family tree.", outcome.member.name)
            };
            FamilyActionResponse::success(message, outcome.member.id.to_string(), &outcome.snapshot)
        }
        Err(err) => {
            warn!("event=ffi_save module=ffi status=error scope={scope}");
            FamilyActionResponse::failure(format!("Failed to save family member: {err}"))
        }
    }
}

/// Deletes one member by id, then returns the refreshed snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn family_delete_member(owner_id: Option<String>, member_id: String) -> FamilyActionResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    let id = match parse_member_id("member_id", member_id.as_str()) {
        Ok(id) => id,
        Err(message) => return FamilyActionResponse::failure(message),
    };

    match with_family_service(|service| {
        service
            .delete_member(&scope, id)
            .map_err(|err| err.to_string())
    }) {
        Ok(snapshot) => {
            FamilyActionResponse::success("Family member has been removed.", id.to_string(), &snapshot)
        }
        Err(err) => FamilyActionResponse::failure(format!("Failed to delete member: {err}")),
    }
}

/// Stores a photo and returns the URL to put in `MemberInput::photo_url`.
#[flutter_rust_bridge::frb(sync)]
pub fn family_upload_photo(
    owner_id: Option<String>,
    file_name: String,
    bytes: Vec<u8>,
) -> PhotoUploadResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    let uploaded = DirectoryPhotoStore::new(resolve_photo_dir())
        .and_then(|store| store.upload(&scope, file_name.as_str(), bytes.as_slice()));
    match uploaded {
        Ok(url) => PhotoUploadResponse {
            ok: true,
            url: Some(url),
            message: "Photo uploaded.".to_string(),
        },
        Err(err) => PhotoUploadResponse {
            ok: false,
            url: None,
            message: format!("Failed to upload photo: {err}"),
        },
    }
}

/// Filters members by name, relation or profession (case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn family_search(owner_id: Option<String>, term: String) -> MemberSearchResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    let (ok, items, message) = list_view(&scope, |snapshot| {
        search_members(&snapshot.members, term.as_str())
            .into_iter()
            .map(to_member_view)
            .collect()
    });
    MemberSearchResponse { ok, items, message }
}

/// Head cards; `gender = Some("male")` reproduces the male-heads tab.
#[flutter_rust_bridge::frb(sync)]
pub fn family_head_cards(owner_id: Option<String>, gender: Option<String>) -> HeadCardsResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    let gender = match parse_gender(gender.as_deref()) {
        Ok(gender) => gender,
        Err(message) => {
            return HeadCardsResponse {
                ok: false,
                items: Vec::new(),
                message,
            }
        }
    };

    let (ok, items, message) = list_view(&scope, |snapshot| {
        head_families(&snapshot.members, gender)
            .into_iter()
            .map(|card| HeadCardView {
                head_id: card.head.id.to_string(),
                spouse_id: card.spouse.map(|spouse| spouse.id.to_string()),
                child_ids: card.children.iter().map(|child| child.id.to_string()).collect(),
            })
            .collect()
    });
    HeadCardsResponse { ok, items, message }
}

/// Members labelled father/mother with their children.
#[flutter_rust_bridge::frb(sync)]
pub fn family_grandparents(owner_id: Option<String>) -> GrandparentsResponse {
    let scope = OwnerScope::from_identity(owner_id.as_deref());
    let (ok, items, message) = list_view(&scope, |snapshot| {
        grandparents(&snapshot.members)
            .into_iter()
            .map(|family| GrandparentView {
                member: to_member_view(family.parent),
                children: family.children.into_iter().map(to_member_view).collect(),
            })
            .collect()
    });
    GrandparentsResponse { ok, items, message }
}

fn list_view<T>(
    scope: &OwnerScope,
    build: impl FnOnce(&FamilySnapshot) -> Vec<T>,
) -> (bool, Vec<T>, String) {
    match load_snapshot(scope) {
        Ok(snapshot) => {
            let items = build(&snapshot);
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            (true, items, message)
        }
        Err(err) => (
            false,
            Vec::new(),
            format!("Failed to load family members: {err}"),
        ),
    }
}

fn load_snapshot(scope: &OwnerScope) -> Result<FamilySnapshot, String> {
    with_family_service(|service| {
        if *scope == OwnerScope::Sample {
            service.ensure_sample_family().map_err(|err| err.to_string())?;
        }
        service.load_snapshot(scope).map_err(|err| err.to_string())
    })
}

fn with_family_service<T>(
    f: impl FnOnce(&FamilyService<SqliteMemberRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("store open failed: {err}"))?;
    let repo = SqliteMemberRepository::try_new(&conn)
        .map_err(|err| format!("store init failed: {err}"))?;
    f(&FamilyService::new(repo))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| env_path(DB_PATH_ENV).unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME)))
        .clone()
}

fn resolve_photo_dir() -> PathBuf {
    PHOTO_DIR
        .get_or_init(|| {
            env_path(PHOTO_DIR_ENV).unwrap_or_else(|| std::env::temp_dir().join(PHOTO_DIR_NAME))
        })
        .clone()
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn to_member_draft(input: MemberInput) -> Result<MemberDraft, String> {
    let gender = parse_gender(input.gender.as_deref())?;

    Ok(MemberDraft {
        id: parse_optional_id("id", input.id.as_deref())?,
        name: input.name,
        gender,
        birth_date: input.birth_date,
        is_deceased: input.is_deceased,
        death_date: input.death_date,
        relation: input.relation,
        parent_id: parse_optional_id("parent_id", input.parent_id.as_deref())?,
        spouse_id: parse_optional_id("spouse_id", input.spouse_id.as_deref())?,
        is_head: input.is_head,
        profession: input.profession,
        residence: input.residence,
        hometown: input.hometown,
        ethnic: input.ethnic,
        nationality: input.nationality,
        note: input.note,
        photo_url: input.photo_url,
        marriage_date: input.marriage_date,
    })
}

fn parse_gender(raw: Option<&str>) -> Result<Option<Gender>, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Gender::parse(value)
            .map(Some)
            .ok_or_else(|| MemberValidationError::InvalidGender(value.to_string()).to_string()),
        None => Ok(None),
    }
}

fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_member_id(field, value).map(Some),
        None => Ok(None),
    }
}

fn parse_member_id(field: &str, raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("{field} `{}` is not a valid id", raw.trim()))
}

fn to_snapshot_view(snapshot: &FamilySnapshot) -> FamilySnapshotView {
    let projection = snapshot.projection();
    FamilySnapshotView {
        members: snapshot.members.iter().map(to_member_view).collect(),
        head_ids: projection.heads.iter().map(|head| head.id.to_string()).collect(),
        couples: projection
            .couples
            .iter()
            .map(|couple| CoupleView {
                first_id: couple.first.id.to_string(),
                second_id: couple.second.id.to_string(),
            })
            .collect(),
        families: projection
            .families
            .iter()
            .map(|family| FamilyView {
                parent_id: family.parent.id.to_string(),
                child_ids: family.children.iter().map(|child| child.id.to_string()).collect(),
            })
            .collect(),
        unaffiliated_ids: projection
            .unaffiliated
            .iter()
            .map(|member| member.id.to_string())
            .collect(),
    }
}

fn to_member_view(member: &Member) -> MemberView {
    MemberView {
        id: member.id.to_string(),
        name: member.name.clone(),
        gender: member.gender.as_str().to_string(),
        birth_date: format_date(member.birth_date),
        is_deceased: member.is_deceased,
        death_date: member.death_date.map(format_date),
        relation: member.relation.to_string(),
        badge: member.relation.badge().as_str().to_string(),
        parent_id: member.parent_id.map(|id| id.to_string()),
        spouse_id: member.spouse_id.map(|id| id.to_string()),
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

#[cfg(test)]
mod tests {
    use super::{
        core_version, family_delete_member, family_head_cards, family_save_member,
        family_search, family_snapshot, family_upload_photo, init_logging, ping, MemberInput,
    };
    use kindred_core::db::open_db;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn save_member_returns_refreshed_snapshot_for_owner() {
        let owner = unique_owner("save");
        let response = family_save_member(Some(owner.clone()), input("Ada", "1990-05-01"));
        assert!(response.ok, "{}", response.message);
        let member_id = response.member_id.expect("saved member id");
        let snapshot = response.snapshot.expect("refreshed snapshot");

        assert_eq!(snapshot.members.len(), 1);
        assert_eq!(snapshot.members[0].id, member_id);
        assert_eq!(snapshot.members[0].badge, "head");
        assert_eq!(snapshot.head_ids, vec![member_id.clone()]);

        let conn = open_db(super::resolve_db_path()).expect("open db");
        let stored_owner: Option<String> = conn
            .query_row(
                "SELECT owner_id FROM family_members WHERE id = ?1",
                rusqlite::params![member_id],
                |row| row.get(0),
            )
            .expect("query member row");
        assert_eq!(stored_owner, Some(owner));
    }

    #[test]
    fn save_member_updates_existing_member() {
        let owner = unique_owner("update");
        let created = family_save_member(Some(owner.clone()), input("Ada", "1990-05-01"));
        let member_id = created.member_id.expect("created id");

        let mut edit = input("Ada Lovelace", "1990-05-01");
        edit.id = Some(member_id.clone());
        edit.relation = Some("daughter".to_string());
        edit.profession = Some("Mathematician".to_string());
        let updated = family_save_member(Some(owner), edit);
        assert!(updated.ok, "{}", updated.message);

        let snapshot = updated.snapshot.expect("refreshed snapshot");
        assert_eq!(snapshot.members.len(), 1);
        assert_eq!(snapshot.members[0].name, "Ada Lovelace");
        assert_eq!(snapshot.members[0].badge, "child");
        assert!(snapshot.head_ids.is_empty());
        assert_eq!(snapshot.unaffiliated_ids, vec![member_id]);
    }

    #[test]
    fn save_member_rejects_invalid_input_without_snapshot() {
        let owner = unique_owner("reject");
        let blank = family_save_member(Some(owner.clone()), input("  ", "1990-05-01"));
        assert!(!blank.ok);
        assert!(blank.snapshot.is_none());
        assert!(blank.message.contains("name"), "{}", blank.message);

        let mut bad_gender = input("Ada", "1990-05-01");
        bad_gender.gender = Some("robot".to_string());
        let response = family_save_member(Some(owner.clone()), bad_gender);
        assert!(!response.ok);

        let mut bad_parent = input("Ada", "1990-05-01");
        bad_parent.parent_id = Some("not-a-uuid".to_string());
        let response = family_save_member(Some(owner.clone()), bad_parent);
        assert!(!response.ok);
        assert!(response.message.contains("parent_id"), "{}", response.message);

        let snapshot = family_snapshot(Some(owner));
        assert!(snapshot.ok, "{}", snapshot.message);
        assert!(snapshot.snapshot.members.is_empty());
    }

    #[test]
    fn delete_member_leaves_child_unaffiliated() {
        let owner = unique_owner("delete");
        let parent = family_save_member(Some(owner.clone()), input("Parent", "1960-01-01"));
        let parent_id = parent.member_id.expect("parent id");

        let mut child = input("Child", "1990-01-01");
        child.relation = Some("son".to_string());
        child.parent_id = Some(parent_id.clone());
        let child_id = family_save_member(Some(owner.clone()), child)
            .member_id
            .expect("child id");

        let response = family_delete_member(Some(owner.clone()), parent_id.clone());
        assert!(response.ok, "{}", response.message);
        let snapshot = response.snapshot.expect("refreshed snapshot");
        assert_eq!(snapshot.members.len(), 1);
        assert!(snapshot.families.is_empty());
        assert_eq!(snapshot.unaffiliated_ids, vec![child_id]);

        let again = family_delete_member(Some(owner.clone()), parent_id);
        assert!(!again.ok);
        let malformed = family_delete_member(Some(owner), "nope".to_string());
        assert!(!malformed.ok);
    }

    #[test]
    fn members_of_another_owner_are_out_of_reach() {
        let alice = unique_owner("alice");
        let mallory = unique_owner("mallory");
        let member_id = family_save_member(Some(alice.clone()), input("Alice", "1980-01-01"))
            .member_id
            .expect("alice member id");

        let mut forged = input("Overwritten", "1980-01-01");
        forged.id = Some(member_id.clone());
        let save = family_save_member(Some(mallory.clone()), forged);
        assert!(!save.ok);
        assert!(save.snapshot.is_none());
        let delete = family_delete_member(Some(mallory), member_id.clone());
        assert!(!delete.ok);

        let snapshot = family_snapshot(Some(alice)).snapshot;
        assert_eq!(snapshot.members.len(), 1);
        assert_eq!(snapshot.members[0].id, member_id);
        assert_eq!(snapshot.members[0].name, "Alice");
    }

    #[test]
    fn signed_out_snapshot_shows_sample_family() {
        let response = family_snapshot(None);
        assert!(response.ok, "{}", response.message);

        let snapshot = response.snapshot;
        let head = snapshot
            .members
            .iter()
            .find(|member| member.name == "Thomas Hale")
            .expect("sample head");
        assert!(snapshot.head_ids.contains(&head.id));
        assert!(!snapshot.couples.is_empty());
        assert!(!snapshot.families.is_empty());
    }

    #[test]
    fn search_and_head_cards_use_owner_snapshot() {
        let owner = unique_owner("views");
        let mut head = input("Rosa", "1970-02-02");
        head.profession = Some("Baker".to_string());
        let head_id = family_save_member(Some(owner.clone()), head)
            .member_id
            .expect("head id");

        let found = family_search(Some(owner.clone()), "BAK".to_string());
        assert!(found.ok, "{}", found.message);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, head_id);

        let cards = family_head_cards(Some(owner.clone()), Some("male".to_string()));
        assert!(cards.ok, "{}", cards.message);
        assert_eq!(cards.items.len(), 1);
        assert_eq!(cards.items[0].head_id, head_id);

        let rejected = family_head_cards(Some(owner), Some("other".to_string()));
        assert!(!rejected.ok);
    }

    #[test]
    fn upload_photo_returns_file_url_and_rejects_empty_payload() {
        let owner = unique_owner("photo");
        let uploaded = family_upload_photo(Some(owner.clone()), "me.png".to_string(), vec![1, 2, 3]);
        assert!(uploaded.ok, "{}", uploaded.message);
        let url = uploaded.url.expect("photo url");
        assert!(url.starts_with("file://"));
        assert!(url.ends_with(".png"));

        let empty = family_upload_photo(Some(owner), "me.png".to_string(), Vec::new());
        assert!(!empty.ok);
        assert!(empty.url.is_none());
    }

    fn input(name: &str, birth_date: &str) -> MemberInput {
        MemberInput {
            name: name.to_string(),
            birth_date: birth_date.to_string(),
            ..MemberInput::default()
        }
    }

    fn unique_owner(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        format!("{prefix}-{}-{nanos}", std::process::id())
    }
}
