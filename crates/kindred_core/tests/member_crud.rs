use kindred_core::db::open_db_in_memory;
use kindred_core::{
    Member, MemberDraft, MemberRepository, MemberValidationError, OwnerScope, RepoError,
    SqliteMemberRepository,
};
use uuid::Uuid;

fn account(id: &str) -> OwnerScope {
    OwnerScope::Account(id.to_string())
}

fn valid(name: &str) -> Member {
    MemberDraft::new(name, "1970-03-04").validate().unwrap()
}

#[test]
fn insert_assigns_store_id_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut draft = MemberDraft::new("Rosa", "1950-02-03");
    draft.profession = Some("Baker".to_string());
    draft.relation = Some("mother".to_string());
    let member = draft.validate().unwrap();

    let stored = repo.insert_member(&account("u1"), &member).unwrap();
    assert_ne!(stored.id, member.id);

    let loaded = repo.get_member(stored.id).unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(loaded.profession.as_deref(), Some("Baker"));
    assert_eq!(loaded.relation.to_string(), "mother");
    assert!(!loaded.is_head);
}

#[test]
fn list_is_scoped_by_owner_and_keeps_insert_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let a = repo.insert_member(&account("u1"), &valid("a")).unwrap();
    repo.insert_member(&account("u2"), &valid("other")).unwrap();
    let b = repo.insert_member(&account("u1"), &valid("b")).unwrap();
    let sample = repo.insert_member(&OwnerScope::Sample, &valid("s")).unwrap();

    let listed = repo.list_members(&account("u1")).unwrap();
    assert_eq!(
        listed.iter().map(|member| member.id).collect::<Vec<_>>(),
        vec![a.id, b.id]
    );

    let samples = repo.list_members(&OwnerScope::Sample).unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].id, sample.id);
    assert_eq!(repo.count_members(&account("u2")).unwrap(), 1);
}

#[test]
fn update_overwrites_fields_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let stored = repo.insert_member(&account("u1"), &valid("draft")).unwrap();

    let mut edit = MemberDraft::from(&stored);
    edit.name = "Final".to_string();
    edit.is_deceased = true;
    edit.death_date = Some("2020-01-01".to_string());
    edit.residence = Some("Oslo".to_string());
    let edited = edit.validate().unwrap();

    let updated = repo.update_member(&account("u1"), &edited).unwrap();
    assert_eq!(updated.id, stored.id);

    let loaded = repo.get_member(stored.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Final");
    assert!(loaded.is_deceased);
    assert_eq!(loaded.residence.as_deref(), Some("Oslo"));
}

#[test]
fn update_and_delete_missing_member_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let ghost = valid("ghost");
    let err = repo.update_member(&account("u1"), &ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));

    let missing = Uuid::new_v4();
    let err = repo.delete_member(&account("u1"), missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn writes_outside_owner_scope_report_not_found_and_change_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let alice = repo.insert_member(&account("alice"), &valid("Alice")).unwrap();

    let mut forged = alice.clone();
    forged.name = "Overwritten".to_string();
    for scope in [account("mallory"), OwnerScope::Sample] {
        let err = repo.update_member(&scope, &forged).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == alice.id));

        let err = repo.delete_member(&scope, alice.id).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == alice.id));
    }

    let kept = repo.list_members(&account("alice")).unwrap();
    assert_eq!(kept, vec![alice]);
}

#[test]
fn seed_remaps_batch_references_to_store_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let parent = valid("parent");
    let mut child = valid("child");
    child.parent_id = Some(parent.id);
    let outside = Uuid::new_v4();
    child.spouse_id = Some(outside);

    let seeded = repo
        .seed_members(&OwnerScope::Sample, &[parent.clone(), child])
        .unwrap();

    assert_eq!(seeded.len(), 2);
    assert_ne!(seeded[0].id, parent.id);
    assert_eq!(seeded[1].parent_id, Some(seeded[0].id));
    assert_eq!(seeded[1].spouse_id, Some(outside));
    assert_eq!(repo.list_members(&OwnerScope::Sample).unwrap(), seeded);
}

#[test]
fn seed_is_all_or_nothing_and_skips_populated_scope() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut broken = valid("broken");
    broken.is_deceased = true;

    let err = repo
        .seed_members(&OwnerScope::Sample, &[valid("first"), broken])
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(MemberValidationError::MissingDeathDate)
    ));
    assert_eq!(repo.count_members(&OwnerScope::Sample).unwrap(), 0);

    let seeded = repo
        .seed_members(&OwnerScope::Sample, &[valid("first")])
        .unwrap();
    assert_eq!(seeded.len(), 1);
    let again = repo
        .seed_members(&OwnerScope::Sample, &[valid("second")])
        .unwrap();
    assert!(again.is_empty());
    assert_eq!(repo.count_members(&OwnerScope::Sample).unwrap(), 1);
}

#[test]
fn delete_removes_row_and_leaves_references_dangling() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let parent = repo.insert_member(&account("u1"), &valid("parent")).unwrap();
    let mut child = valid("child");
    child.parent_id = Some(parent.id);
    let child = repo.insert_member(&account("u1"), &child).unwrap();

    repo.delete_member(&account("u1"), parent.id).unwrap();

    assert!(repo.get_member(parent.id).unwrap().is_none());
    let orphan = repo.get_member(child.id).unwrap().unwrap();
    assert_eq!(orphan.parent_id, Some(parent.id));
}

#[test]
fn insert_rejects_invalid_member() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut member = valid("x");
    member.is_deceased = true;
    member.death_date = None;

    let err = repo.insert_member(&account("u1"), &member).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(MemberValidationError::MissingDeathDate)
    ));
    assert_eq!(repo.count_members(&account("u1")).unwrap(), 0);
}

#[test]
fn stale_head_flag_is_reconciled_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let stored = repo.insert_member(&account("u1"), &valid("legacy")).unwrap();
    conn.execute(
        "UPDATE family_members SET relation = 'father', is_head = 1 WHERE id = ?1;",
        [stored.id.to_string()],
    )
    .unwrap();

    let loaded = repo.get_member(stored.id).unwrap().unwrap();
    assert!(loaded.is_head);
    assert_eq!(loaded.relation.to_string(), "father,head");
}

#[test]
fn invalid_persisted_rows_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO family_members (id, owner_id, name, birth_date, spouse_id)
         VALUES (?1, 'u1', 'Broken', '1970-01-01', 'not-a-uuid');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let err = repo.list_members(&account("u1")).unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert!(message.contains("spouse_id")),
        other => panic!("unexpected error: {other}"),
    }
}
