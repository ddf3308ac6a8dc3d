// Index Field Contract Tests
//
// These tests pin the index field names and value shapes that search
// front ends query. Renaming a field or changing a value shape silently
// breaks every search that filters on access.

use hydra_rights::{
    project, BulkPermissions, IndexConfig, IndexValue, Indexable, PermissionLevel, RightsRecord,
};

/// WHY: Search filters are written against these exact names
/// BREAKS: Access-filtered search returns nothing if a name drifts
#[test]
fn default_field_names_are_fixed() {
    let config = IndexConfig::default();
    let expected = vec![
        "discover_access_group_ssim",
        "discover_access_person_ssim",
        "read_access_group_ssim",
        "read_access_person_ssim",
        "edit_access_group_ssim",
        "edit_access_person_ssim",
        "embargo_release_date_dtsi",
        "lease_expiration_date_dtsi",
        "visibility_during_embargo_ssim",
        "visibility_after_embargo_ssim",
        "visibility_during_lease_ssim",
        "visibility_after_lease_ssim",
    ];
    assert_eq!(config.fields.all(), expected);

    for name in &expected {
        let prefixed = format!("inheritable_{}", name);
        assert!(config.inheritable.all().contains(&prefixed.as_str()), "missing {prefixed}");
    }
}

/// WHY: Absent (level, kind) pairs must not appear at all
/// BREAKS: An empty list matches "field exists" queries and leaks objects
#[test]
fn absent_pairs_are_omitted_not_empty() {
    let mut record = RightsRecord::new();
    record.update_permissions(
        &BulkPermissions::new()
            .group("g1", PermissionLevel::Edit)
            .group("g2", PermissionLevel::Edit)
            .person("joe", PermissionLevel::Discover),
    );

    let doc = record.to_index_fields(&IndexConfig::default());

    assert_eq!(doc.len(), 2);
    assert_eq!(doc["edit_access_group_ssim"], IndexValue::list(["g1", "g2"]));
    assert_eq!(doc["discover_access_person_ssim"], IndexValue::list(["joe"]));
    for value in doc.values() {
        if let IndexValue::List(values) = value {
            assert!(!values.is_empty());
        }
    }
}

/// WHY: Inheritable and normal fields must never mix
/// BREAKS: Children would be indexed as if they carried the parent's own rules
#[test]
fn inheritable_output_has_no_normal_fields() {
    let mut record = RightsRecord::new();
    record.update_permissions(
        &BulkPermissions::new()
            .group("a", PermissionLevel::Edit)
            .group("b", PermissionLevel::Edit)
            .person("nero", PermissionLevel::Read),
    );
    record.set_embargo_release_date(Some("2102-10-01")).unwrap();
    record.set_visibility_during_embargo(Some("private"));

    let config = IndexConfig::default();
    let doc = project(&record).to_index_fields(&config);

    assert_eq!(doc["inheritable_edit_access_group_ssim"], IndexValue::list(["a", "b"]));
    assert_eq!(doc["inheritable_read_access_person_ssim"], IndexValue::list(["nero"]));
    assert_eq!(
        doc["inheritable_embargo_release_date_dtsi"],
        IndexValue::Scalar("2102-10-01T00:00:00Z".to_string())
    );
    for key in doc.keys() {
        assert!(key.starts_with("inheritable_"), "unexpected field {key}");
    }
}

/// WHY: Date fields are parsed by the search engine as UTC instants
/// BREAKS: Range queries on release dates if the suffix or precision changes
#[test]
fn dates_are_second_precision_utc() {
    let mut record = RightsRecord::new();
    record.set_embargo_release_date(Some("2010-12-02T01:59:59.750+02:00")).unwrap();

    let doc = record.to_index_fields(&IndexConfig::default());
    assert_eq!(
        doc["embargo_release_date_dtsi"].as_scalar(),
        Some("2010-12-01T23:59:59Z")
    );
}

/// WHY: A cleared date must vanish from the index
/// BREAKS: A sentinel date would keep objects embargoed forever
#[test]
fn cleared_dates_leave_no_field() {
    let mut record = RightsRecord::new();
    record.set_embargo_release_date(Some("2010-12-01")).unwrap();
    record.set_lease_expiration_date(Some("2010-12-01")).unwrap();
    record.set_embargo_release_date(None).unwrap();
    record.set_lease_expiration_date(None).unwrap();

    assert!(record.embargo_release_date().is_none());
    assert!(record.lease_expiration_date().is_none());
    assert!(record.to_index_fields(&IndexConfig::default()).is_empty());
}
