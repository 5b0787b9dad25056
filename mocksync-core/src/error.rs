//! Error types for mocksync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling the profile fixture set.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Underlying I/O failure while reading a fixture directory or file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A profile file contained only whitespace.
    #[error("profile fixture is empty: {path}")]
    EmptyDocument { path: PathBuf },

    /// Two fixtures resolved to the same profile id.
    #[error("duplicate profile id '{id}'")]
    DuplicateProfile { id: String },
}
