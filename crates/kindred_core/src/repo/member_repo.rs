//! Member repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/insert/update/delete over `family_members`.
//! - Scope every write to the caller's owner; foreign rows read as missing.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Member::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Lists are ordered by `created_at ASC, rowid ASC` (fetch order).
//! - `parent_id`/`spouse_id` are stored as given; targets are not checked.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::draft::format_date;
use crate::model::member::{Gender, Member, MemberId, MemberValidationError};
use crate::model::owner::OwnerScope;
use crate::model::relation::RelationSet;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMBER_SELECT_SQL: &str = "SELECT
    id,
    name,
    gender,
    birth_date,
    is_deceased,
    death_date,
    relation,
    parent_id,
    spouse_id,
    is_head,
    profession,
    residence,
    hometown,
    ethnic,
    nationality,
    note,
    photo_url,
    marriage_date
FROM family_members";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for member persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemberValidationError),
    Db(DbError),
    NotFound(MemberId),
    /// Connection schema is not at the migrated version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "member not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "member repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted member data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::UninitializedConnection { .. } | Self::InvalidData(_) => {
                None
            }
        }
    }
}

impl From<MemberValidationError> for RepoError {
    fn from(value: MemberValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Table-oriented member store.
pub trait MemberRepository {
    /// Lists every member of one owner scope in fetch order.
    fn list_members(&self, scope: &OwnerScope) -> RepoResult<Vec<Member>>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// Persists a new member; the store assigns the returned member's id.
    fn insert_member(&self, scope: &OwnerScope, member: &Member) -> RepoResult<Member>;
    /// Overwrites every field of an existing member, keyed by `member.id`.
    ///
    /// A member outside `scope` is reported as `NotFound` and left untouched.
    fn update_member(&self, scope: &OwnerScope, member: &Member) -> RepoResult<Member>;
    /// Removes one member of `scope`; other scopes report `NotFound`.
    fn delete_member(&self, scope: &OwnerScope, id: MemberId) -> RepoResult<()>;
    fn count_members(&self, scope: &OwnerScope) -> RepoResult<u64>;
    /// Inserts a batch into an empty scope, all or nothing.
    ///
    /// Every member gets a store-assigned id; `parent_id`/`spouse_id` that
    /// point inside the batch are rewritten to the new ids. Returns an empty
    /// list without writing when the scope already has members.
    fn seed_members(&self, scope: &OwnerScope, members: &[Member]) -> RepoResult<Vec<Member>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn list_members(&self, scope: &OwnerScope) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL}
             WHERE owner_id IS ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([scope.owner_id()])?;
        let mut members = Vec::new();

        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(members)
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }

        Ok(None)
    }

    fn insert_member(&self, scope: &OwnerScope, member: &Member) -> RepoResult<Member> {
        member.validate()?;

        let mut stored = member.clone();
        stored.id = Uuid::new_v4();
        insert_row(self.conn, scope, &mut stored)?;
        Ok(stored)
    }

    fn update_member(&self, scope: &OwnerScope, member: &Member) -> RepoResult<Member> {
        member.validate()?;

        let mut stored = member.clone();
        stored.reconcile_head();

        let changed = self.conn.execute(
            "UPDATE family_members
             SET
                name = ?1,
                gender = ?2,
                birth_date = ?3,
                is_deceased = ?4,
                death_date = ?5,
                relation = ?6,
                parent_id = ?7,
                spouse_id = ?8,
                is_head = ?9,
                profession = ?10,
                residence = ?11,
                hometown = ?12,
                ethnic = ?13,
                nationality = ?14,
                note = ?15,
                photo_url = ?16,
                marriage_date = ?17,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?18 AND owner_id IS ?19;",
            params![
                stored.name.as_str(),
                stored.gender.as_str(),
                format_date(stored.birth_date),
                bool_to_int(stored.is_deceased),
                stored.death_date.map(format_date),
                stored.relation.to_string(),
                stored.parent_id.map(|id| id.to_string()),
                stored.spouse_id.map(|id| id.to_string()),
                bool_to_int(stored.is_head),
                stored.profession.as_deref(),
                stored.residence.as_deref(),
                stored.hometown.as_deref(),
                stored.ethnic.as_deref(),
                stored.nationality.as_deref(),
                stored.note.as_deref(),
                stored.photo_url.as_deref(),
                stored.marriage_date.map(format_date),
                stored.id.to_string(),
                scope.owner_id(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(stored.id));
        }

        Ok(stored)
    }

    fn delete_member(&self, scope: &OwnerScope, id: MemberId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM family_members WHERE id = ?1 AND owner_id IS ?2;",
            params![id.to_string(), scope.owner_id()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_members(&self, scope: &OwnerScope) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM family_members WHERE owner_id IS ?1;",
            [scope.owner_id()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData("negative member count".to_string()))
    }

    fn seed_members(&self, scope: &OwnerScope, members: &[Member]) -> RepoResult<Vec<Member>> {
        // Immediate: a concurrent seeder waits here instead of double-seeding.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM family_members WHERE owner_id IS ?1;",
            [scope.owner_id()],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(Vec::new());
        }

        let assigned: HashMap<MemberId, MemberId> = members
            .iter()
            .map(|member| (member.id, Uuid::new_v4()))
            .collect();
        let remap = |id: Option<MemberId>| id.map(|id| assigned.get(&id).copied().unwrap_or(id));

        let mut seeded = Vec::with_capacity(members.len());
        for member in members {
            member.validate()?;
            let mut stored = member.clone();
            stored.id = assigned.get(&member.id).copied().unwrap_or_else(Uuid::new_v4);
            stored.parent_id = remap(member.parent_id);
            stored.spouse_id = remap(member.spouse_id);
            insert_row(&tx, scope, &mut stored)?;
            seeded.push(stored);
        }

        // Dropping `tx` on any early return above rolls the batch back.
        tx.commit()?;
        Ok(seeded)
    }
}

fn insert_row(conn: &Connection, scope: &OwnerScope, stored: &mut Member) -> RepoResult<()> {
    stored.reconcile_head();
    conn.execute(
        "INSERT INTO family_members (
            id,
            owner_id,
            name,
            gender,
            birth_date,
            is_deceased,
            death_date,
            relation,
            parent_id,
            spouse_id,
            is_head,
            profession,
            residence,
            hometown,
            ethnic,
            nationality,
            note,
            photo_url,
            marriage_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                  ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19);",
        params![
            stored.id.to_string(),
            scope.owner_id(),
            stored.name.as_str(),
            stored.gender.as_str(),
            format_date(stored.birth_date),
            bool_to_int(stored.is_deceased),
            stored.death_date.map(format_date),
            stored.relation.to_string(),
            stored.parent_id.map(|id| id.to_string()),
            stored.spouse_id.map(|id| id.to_string()),
            bool_to_int(stored.is_head),
            stored.profession.as_deref(),
            stored.residence.as_deref(),
            stored.hometown.as_deref(),
            stored.ethnic.as_deref(),
            stored.nationality.as_deref(),
            stored.note.as_deref(),
            stored.photo_url.as_deref(),
            stored.marriage_date.map(format_date),
        ],
    )?;
    Ok(())
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let id = parse_uuid_column(row, "id")?.ok_or_else(|| {
        RepoError::InvalidData("missing id in family_members.id".to_string())
    })?;

    let gender_text: String = row.get("gender")?;
    let gender = Gender::parse(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_text}` in family_members.gender"
        ))
    })?;

    let birth_date = parse_date_column(row, "birth_date")?.ok_or_else(|| {
        RepoError::InvalidData(format!("missing birth_date for member {id}"))
    })?;

    let mut member = Member::with_id(id, row.get::<_, String>("name")?, birth_date);
    member.gender = gender;
    member.is_deceased = parse_bool_column(row, "is_deceased")?;
    member.death_date = parse_date_column(row, "death_date")?;
    member.relation = RelationSet::parse(&row.get::<_, String>("relation")?);
    member.parent_id = parse_uuid_column(row, "parent_id")?;
    member.spouse_id = parse_uuid_column(row, "spouse_id")?;
    member.is_head = parse_bool_column(row, "is_head")?;
    member.profession = row.get("profession")?;
    member.residence = row.get("residence")?;
    member.hometown = row.get("hometown")?;
    member.ethnic = row.get("ethnic")?;
    member.nationality = row.get("nationality")?;
    member.note = row.get("note")?;
    member.photo_url = row.get("photo_url")?;
    member.marriage_date = parse_date_column(row, "marriage_date")?;
    member.reconcile_head();

    member.validate()?;
    Ok(member)
}

fn parse_uuid_column(row: &Row<'_>, column: &'static str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => Uuid::parse_str(&text).map(Some).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid uuid value `{text}` in family_members.{column}"
            ))
        }),
        None => Ok(None),
    }
}

fn parse_date_column(row: &Row<'_>, column: &'static str) -> RepoResult<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid date `{text}` in family_members.{column}"
                ))
            }),
        None => Ok(None),
    }
}

fn parse_bool_column(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in family_members.{column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
