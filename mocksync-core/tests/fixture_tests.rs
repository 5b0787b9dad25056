//! Profile fixture loading tests.

use std::fs;

use mocksync_core::{
    FixtureError, Profile, ProfileId, ProfileSet, BUILTIN_PROFILE_ID, BUILTIN_PROFILE_XML,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// 1. Built-in fixture
// ---------------------------------------------------------------------------

#[test]
fn builtin_set_holds_exactly_the_test_profile() {
    let set = ProfileSet::builtin();
    assert_eq!(set.len(), 1);
    assert_eq!(set.first().id.0, BUILTIN_PROFILE_ID);
    assert_eq!(set.first().document, BUILTIN_PROFILE_XML);
}

#[test]
fn builtin_document_describes_account_45() {
    let doc = Profile::builtin().document;
    assert!(doc.starts_with("<?xml"));
    assert!(doc.contains(r#"<key value="45" name="accountid"/>"#));
    assert!(doc.contains(r#"<key value="two-way" name="Sync Direction"/>"#));
}

// ---------------------------------------------------------------------------
// 2. Directory loading
// ---------------------------------------------------------------------------

#[test]
fn load_dir_appends_xml_files_in_name_order_after_builtin() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("b-calendar.xml"), "<profile name=\"b\"/>").expect("write b");
    fs::write(dir.path().join("a-contacts.xml"), "<profile name=\"a\"/>").expect("write a");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write txt");

    let set = ProfileSet::load_dir(dir.path()).expect("load");
    let ids: Vec<String> = set.ids().into_iter().map(|id| id.0).collect();
    assert_eq!(ids, vec![BUILTIN_PROFILE_ID, "a-contacts", "b-calendar"]);
    assert_eq!(set.first().id.0, BUILTIN_PROFILE_ID, "built-in stays first");

    let found = set.get(&ProfileId::from("a-contacts")).expect("lookup");
    assert_eq!(found.document, "<profile name=\"a\"/>");
}

#[test]
fn load_dir_rejects_empty_document_with_path() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("blank.xml"), "  \n").expect("write");

    let err = ProfileSet::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, FixtureError::EmptyDocument { .. }), "got: {err}");
    assert!(err.to_string().contains("blank.xml"));
}

#[test]
fn load_dir_rejects_file_shadowing_builtin_id() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("test-profile.xml"), "<profile/>").expect("write");

    let err = ProfileSet::load_dir(dir.path()).unwrap_err();
    assert!(
        matches!(err, FixtureError::DuplicateProfile { ref id } if id == BUILTIN_PROFILE_ID),
        "got: {err}"
    );
}

#[test]
fn load_missing_dir_returns_io_error_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("nope");

    let err = ProfileSet::load_dir(&missing).unwrap_err();
    assert!(matches!(err, FixtureError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("nope"));
}

#[test]
fn unknown_id_lookup_returns_none() {
    let set = ProfileSet::builtin();
    assert!(set.get(&ProfileId::from("does-not-exist")).is_none());
}
