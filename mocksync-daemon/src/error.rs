use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the mock daemon runtime, bus binding, client, and config.
///
/// The sync operations themselves never fail; everything here is transport or setup.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture error: {0}")]
    Fixture(#[from] mocksync_core::FixtureError),

    #[error("bus error: {0}")]
    Bus(#[from] zbus::Error),

    #[error("failed to parse config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("mock sync service is not running (no owner for {name})")]
    ServiceNotRunning { name: String },

    #[error("{task} task join failure: {source}")]
    TaskJoin {
        task: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
