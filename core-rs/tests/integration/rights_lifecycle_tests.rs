//! Integration tests for the rights record lifecycle
//!
//! Tests the full path a record takes through a repository front end:
//! - Editing permissions and dates
//! - Saving and reloading
//! - Indexing the record and its inheritable projection
//! - Evaluating access over time

use chrono::{DateTime, Months, TimeZone, Utc};
use hydra_rights::{
    authorize, effective_level_for_agent, load_record, project, save_record, Action, Agent, BulkPermissions,
    IndexConfig, IndexValue, Indexable, License, PermissionLevel, Principal, RightsError, RightsRecord,
};
use std::fs;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 10, 30, 0).unwrap()
}

#[test]
fn test_complete_rights_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let record_path = temp_dir.path().join("objects/1234/rights.yaml");

    // 1. Edit session: grant access and embargo the object
    let mut record = RightsRecord::new();
    record.update_permissions(
        &BulkPermissions::new()
            .person("researcher1", PermissionLevel::Edit)
            .group("archivist", PermissionLevel::Edit)
            .group("public", PermissionLevel::Read)
            .group("bob", PermissionLevel::Discover),
    );
    record.set_license(Some(License {
        title: Some("Creative Commons Attribution 3.0 Unported License.".to_string()),
        description: None,
        url: Some("http://creativecommons.org/licenses/by/3.0/".to_string()),
    }));
    record.set_embargo_release_at(Some(now() + Months::new(1)));
    record.set_visibility_during_embargo(Some("restricted"));
    record.set_visibility_after_embargo(Some("open"));

    // 2. Save and reload
    save_record(&record_path, &record).unwrap();
    let reloaded = load_record(&record_path).unwrap();
    assert_eq!(reloaded, record);

    // 3. Index the object
    let config = IndexConfig::default();
    let doc = reloaded.to_index_fields(&config);
    assert_eq!(doc["edit_access_person_ssim"], IndexValue::list(["researcher1"]));
    assert_eq!(doc["edit_access_group_ssim"], IndexValue::list(["archivist"]));
    assert_eq!(doc["read_access_group_ssim"], IndexValue::list(["public"]));
    assert_eq!(doc["discover_access_group_ssim"], IndexValue::list(["bob"]));
    assert_eq!(doc["visibility_during_embargo_ssim"], IndexValue::list(["restricted"]));
    assert!(doc.contains_key("embargo_release_date_dtsi"));

    // 4. Anonymous visitors are shut out during the embargo, editors are not
    assert!(authorize(&reloaded, &Agent::anonymous(), Action::Read, now()).is_err());
    assert!(authorize(&reloaded, &Agent::user("researcher1"), Action::Edit, now()).is_ok());

    // 5. After release the "after" visibility opens the object
    let later = now() + Months::new(2);
    assert_eq!(
        effective_level_for_agent(&reloaded, &Agent::anonymous(), later),
        PermissionLevel::Read
    );
}

#[test]
fn test_parent_hands_rules_to_children() {
    let mut parent = RightsRecord::new();
    parent.set_permission(Principal::group("africana-faculty"), PermissionLevel::Edit);
    parent.set_permission(Principal::group("cool-kids"), PermissionLevel::Edit);
    parent.set_permission(Principal::group("slightly-cool-kids"), PermissionLevel::Read);
    parent.set_permission(Principal::group("posers"), PermissionLevel::Discover);
    parent.set_permission(Principal::individual("julius_caesar"), PermissionLevel::Edit);
    parent.set_permission(Principal::individual("nero"), PermissionLevel::Read);
    parent.set_permission(Principal::individual("constantine"), PermissionLevel::Discover);
    parent.set_embargo_release_date(Some("2102-10-01")).unwrap();

    let config = IndexConfig::default();
    let doc = project(&parent).to_index_fields(&config);

    assert_eq!(doc["inheritable_discover_access_group_ssim"], IndexValue::list(["posers"]));
    assert_eq!(doc["inheritable_discover_access_person_ssim"], IndexValue::list(["constantine"]));
    assert_eq!(doc["inheritable_read_access_group_ssim"], IndexValue::list(["slightly-cool-kids"]));
    assert_eq!(doc["inheritable_read_access_person_ssim"], IndexValue::list(["nero"]));
    assert_eq!(
        doc["inheritable_edit_access_group_ssim"],
        IndexValue::list(["africana-faculty", "cool-kids"])
    );
    assert_eq!(doc["inheritable_edit_access_person_ssim"], IndexValue::list(["julius_caesar"]));
    assert_eq!(
        doc["inheritable_embargo_release_date_dtsi"],
        IndexValue::Scalar("2102-10-01T00:00:00Z".to_string())
    );
    assert_eq!(doc.len(), 7);
}

#[test]
fn test_embargo_deactivation_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rights.json");

    let mut record = RightsRecord::new();
    record.set_embargo_release_date(Some("2024-12-01")).unwrap();
    record.set_visibility_during_embargo(Some("private"));
    record.deactivate_embargo(now());
    save_record(&path, &record).unwrap();

    let reloaded = load_record(&path).unwrap();
    assert!(reloaded.embargo_release_date().is_none());
    assert_eq!(reloaded.embargo_history().len(), 1);
    assert!(reloaded.embargo_history()[0].contains("was private"));

    let doc = reloaded.to_index_fields(&IndexConfig::default());
    assert!(!doc.contains_key("embargo_release_date_dtsi"));
    assert!(!doc.contains_key("visibility_during_embargo_ssim"));
}

#[test]
fn test_custom_index_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("index.yaml");
    fs::write(
        &config_path,
        r#"
fields:
  read:
    group: readers_group_ssim
    individual: readers_person_ssim
"#,
    )
    .unwrap();

    let config = IndexConfig::load(&config_path).unwrap();

    let mut record = RightsRecord::new();
    record.set_permission(Principal::group("public"), PermissionLevel::Read);

    let doc = record.to_index_fields(&config);
    assert_eq!(doc["readers_group_ssim"], IndexValue::list(["public"]));

    let inherited = project(&record).to_index_fields(&config);
    assert_eq!(inherited["inheritable_read_access_group_ssim"], IndexValue::list(["public"]));
}

#[test]
fn test_hand_written_yaml_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rights.yml");
    fs::write(
        &path,
        r#"
permissions:
  group:
    librarians: read
    students: discover
  person:
    maria: edit
lease_expiration_date: 2010-12-01T23:59:59Z
visibility_during_lease: open
visibility_after_lease: restricted
"#,
    )
    .unwrap();

    let record = load_record(&path).unwrap();
    assert_eq!(record.groups().len(), 2);
    assert_eq!(record.permission(&Principal::individual("maria")), PermissionLevel::Edit);
    assert!(!record.is_active_lease(now()));

    // Lease has expired, so the "after" label applies
    let student = Agent::user("sam").with_group("students");
    assert_eq!(effective_level_for_agent(&record, &student, now()), PermissionLevel::None);
}

#[test]
fn test_invalid_date_in_edit_session() {
    let mut record = RightsRecord::new();
    let err = record.set_lease_expiration_date(Some("next tuesday")).unwrap_err();

    match err {
        RightsError::InvalidDate { field, value } => {
            assert_eq!(field, "lease_expiration_date");
            assert_eq!(value, "next tuesday");
        }
        other => panic!("Expected InvalidDate, got {other:?}"),
    }
    assert!(record.lease_expiration_date().is_none());
}
