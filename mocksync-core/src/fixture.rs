//! Profile fixtures served by the mock daemon.
//!
//! # Layout
//!
//! ```text
//! <profiles_dir>/
//!   <profile_id>.xml    (one document per file, id = file stem)
//! ```
//!
//! The built-in `test-profile` document is always the first entry of a
//! [`ProfileSet`]. Directory fixtures are appended after it in file-name order,
//! so the first-entry answer of `syncProfile` never changes.

use std::path::{Path, PathBuf};

use crate::error::FixtureError;
use crate::types::ProfileId;

/// Id of the built-in fixture (the `name` attribute of its root element).
pub const BUILTIN_PROFILE_ID: &str = "test-profile";

/// Google contacts profile for account 45, two-way sync, scheduled daily at 05:00.
pub const BUILTIN_PROFILE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<profile type="sync" name="test-profile">
    <key value="45" name="accountid"/>
    <key value="contacts" name="category"/>
    <key value="google-contacts-ubuntu@gmail.com" name="displayname"/>
    <key value="true" name="enabled"/>
    <key value="google-contacts" name="remote_service_name"/>
    <key value="true" name="hidden"/>
    <key value="30" name="sync_since_days_past"/>
    <key value="true" name="use_accounts"/>
    <profile type="client" name="googlecontacts">
        <key value="two-way" name="Sync Direction"/>
    </profile>
    <schedule time="05:00:00" days="4,5,2,3,1,6,7" syncconfiguredtime="" interval="0" enabled="true">
        <rush end="" externalsync="false" days="" interval="15" begin="" enabled="false"/>
    </schedule>
</profile>
"#;

/// A serialized sync profile. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub document: String,
}

impl Profile {
    pub fn new(id: impl Into<ProfileId>, document: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document: document.into(),
        }
    }

    /// The built-in fixture document.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_PROFILE_ID, BUILTIN_PROFILE_XML)
    }
}

/// Ordered, non-empty sequence of profiles.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileSet {
    /// A set holding only the built-in fixture.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![Profile::builtin()],
        }
    }

    /// Built-in fixture followed by every `*.xml` file in `dir`, sorted by file name.
    pub fn load_dir(dir: &Path) -> Result<Self, FixtureError> {
        let mut set = Self::builtin();
        for path in list_xml_files(dir)? {
            let document = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            if document.trim().is_empty() {
                return Err(FixtureError::EmptyDocument { path });
            }
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            set.push(Profile::new(id, document))?;
        }
        Ok(set)
    }

    /// Append a profile; ids must be unique.
    pub fn push(&mut self, profile: Profile) -> Result<(), FixtureError> {
        if self.profiles.iter().any(|p| p.id == profile.id) {
            return Err(FixtureError::DuplicateProfile { id: profile.id.0 });
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// First profile in the set. This is what the mock answers for every id.
    pub fn first(&self) -> &Profile {
        // Invariant: constructors always seed the built-in fixture.
        &self.profiles[0]
    }

    /// Real lookup by id.
    pub fn get(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| &p.id == id)
    }

    pub fn ids(&self) -> Vec<ProfileId> {
        self.profiles.iter().map(|p| p.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }
}

fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let is_xml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);
        if is_xml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> FixtureError {
    FixtureError::Io {
        path: path.into(),
        source,
    }
}
