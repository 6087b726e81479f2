use chrono::NaiveDate;
use kindred_core::{Gender, Member, MemberDraft, MemberValidationError, RelationSet};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn member_new_sets_defaults() {
    let member = Member::new("Ada", date(1990, 5, 1));

    assert!(!member.id.is_nil());
    assert_eq!(member.gender, Gender::Male);
    assert!(!member.is_deceased);
    assert!(member.relation.is_empty());
    assert!(!member.is_family_head());
    assert!(member.validate().is_ok());
}

#[test]
fn draft_defaults_relation_to_head_and_derives_flag() {
    let member = MemberDraft::new("  Ada  ", "1990-05-01").validate().unwrap();

    assert_eq!(member.name, "Ada");
    assert_eq!(member.relation.to_string(), "head");
    assert!(member.is_head);
    assert_eq!(member.gender, Gender::Male);
}

#[test]
fn draft_relation_label_sets_head_flag() {
    let mut draft = MemberDraft::new("Ada", "1990-05-01");
    draft.relation = Some("father, head".to_string());

    let member = draft.validate().unwrap();
    assert!(member.is_head);
    assert_eq!(member.relation.to_string(), "father,head");
}

#[test]
fn explicit_head_flag_gains_head_label() {
    let mut draft = MemberDraft::new("Ada", "1990-05-01");
    draft.relation = Some("father".to_string());
    draft.is_head = true;

    let member = draft.validate().unwrap();
    assert!(member.is_head);
    assert!(member.relation.contains("head"));
    assert!(member.relation.contains("father"));
}

#[test]
fn non_head_relation_clears_head_flag() {
    let mut draft = MemberDraft::new("Ada", "1990-05-01");
    draft.relation = Some("daughter".to_string());

    let member = draft.validate().unwrap();
    assert!(!member.is_head);
}

#[test]
fn blank_name_is_rejected() {
    let err = MemberDraft::new("   ", "1990-05-01").validate().unwrap_err();
    assert_eq!(err, MemberValidationError::MissingName);
    assert!(err.to_string().contains("name"));
}

#[test]
fn missing_or_invalid_birth_date_is_rejected() {
    let missing = MemberDraft::new("Ada", "").validate().unwrap_err();
    assert_eq!(missing, MemberValidationError::MissingBirthDate);

    let invalid = MemberDraft::new("Ada", "05/01/1990").validate().unwrap_err();
    assert!(matches!(
        invalid,
        MemberValidationError::InvalidDate { field: "birth_date", .. }
    ));
}

#[test]
fn deceased_without_death_date_is_rejected() {
    let mut draft = MemberDraft::new("Ada", "1900-01-01");
    draft.is_deceased = true;

    let err = draft.validate().unwrap_err();
    assert_eq!(err, MemberValidationError::MissingDeathDate);
    assert!(err.to_string().contains("death_date"));
}

#[test]
fn death_before_birth_is_rejected() {
    let mut draft = MemberDraft::new("Ada", "1900-01-01");
    draft.is_deceased = true;
    draft.death_date = Some("1899-12-31".to_string());

    let err = draft.validate().unwrap_err();
    assert_eq!(
        err,
        MemberValidationError::DeathBeforeBirth {
            birth: date(1900, 1, 1),
            death: date(1899, 12, 31),
        }
    );
}

#[test]
fn blank_descriptive_fields_become_absent() {
    let mut draft = MemberDraft::new("Ada", "1990-05-01");
    draft.profession = Some("   ".to_string());
    draft.hometown = Some(" Lyon ".to_string());
    draft.note = Some(String::new());

    let member = draft.validate().unwrap();
    assert_eq!(member.profession, None);
    assert_eq!(member.hometown.as_deref(), Some("Lyon"));
    assert_eq!(member.note, None);
}

#[test]
fn draft_roundtrips_through_member() {
    let mut draft = MemberDraft::new("Ada", "1900-01-01");
    draft.id = Some(Uuid::new_v4());
    draft.gender = Some(Gender::Female);
    draft.is_deceased = true;
    draft.death_date = Some("1970-06-30".to_string());
    draft.relation = Some("mother,spouse".to_string());
    draft.marriage_date = Some("1921-04-12".to_string());

    let member = draft.validate().unwrap();
    let reloaded = MemberDraft::from(&member).validate().unwrap();
    assert_eq!(reloaded, member);
}

#[test]
fn member_serialization_uses_expected_wire_fields() {
    let member_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut member = Member::with_id(member_id, "Ada", date(1990, 5, 1));
    member.gender = Gender::Female;
    member.relation = RelationSet::parse("head,mother");
    member.is_head = true;

    let json = serde_json::to_value(&member).unwrap();
    assert_eq!(json["id"], member_id.to_string());
    assert_eq!(json["gender"], "female");
    assert_eq!(json["birth_date"], "1990-05-01");
    assert_eq!(json["relation"], "head,mother");
    assert_eq!(json["is_head"], true);
    assert_eq!(json["death_date"], serde_json::Value::Null);

    let decoded: Member = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, member);
}
