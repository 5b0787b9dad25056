//! Domain types for the mock sync daemon.
//!
//! Status codes mirror the `com.meego.msyncd` contract; the numeric values are
//! part of the wire format and must not be reordered.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a sync profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProfileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Sync session state as carried by the `syncStatus` signal.
///
/// `Done` (4) sorts before `Aborted` (5); the codes are identifiers, not a
/// severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Sync request accepted and waiting in the queue.
    Queued,
    /// Sync session has started.
    Running,
    /// Sync session is progressing.
    Progress,
    /// Sync session failed or could not be started.
    Error,
    /// Sync session completed successfully.
    Done,
    /// Sync session was aborted.
    Aborted,
}

impl SyncStatus {
    /// Wire code for this status.
    pub fn code(self) -> i32 {
        match self {
            SyncStatus::Queued => 0,
            SyncStatus::Running => 1,
            SyncStatus::Progress => 2,
            SyncStatus::Error => 3,
            SyncStatus::Done => 4,
            SyncStatus::Aborted => 5,
        }
    }

    /// Decode a wire code. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SyncStatus::Queued),
            1 => Some(SyncStatus::Running),
            2 => Some(SyncStatus::Progress),
            3 => Some(SyncStatus::Error),
            4 => Some(SyncStatus::Done),
            5 => Some(SyncStatus::Aborted),
            _ => None,
        }
    }

    /// `true` once no further events are expected for the session.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SyncStatus::Error | SyncStatus::Done | SyncStatus::Aborted
        )
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Queued => "queued",
            SyncStatus::Running => "running",
            SyncStatus::Progress => "progress",
            SyncStatus::Error => "error",
            SyncStatus::Done => "done",
            SyncStatus::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One `syncStatus` notification. Emitted, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub profile_id: ProfileId,
    pub status: SyncStatus,
    pub message: String,
    pub percent: i32,
}

impl StatusEvent {
    pub fn new(
        profile_id: impl Into<ProfileId>,
        status: SyncStatus,
        message: impl Into<String>,
        percent: i32,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            status,
            message: message.into(),
            percent,
        }
    }

    /// The `(s, i, s, i)` tuple carried on the bus.
    pub fn to_wire(&self) -> (String, i32, String, i32) {
        (
            self.profile_id.0.clone(),
            self.status.code(),
            self.message.clone(),
            self.percent,
        )
    }

    /// Decode a bus tuple. Returns `None` for an unknown status code.
    pub fn from_wire(profile_id: String, status: i32, message: String, percent: i32) -> Option<Self> {
        let status = SyncStatus::from_code(status)?;
        Some(Self {
            profile_id: ProfileId(profile_id),
            status,
            message,
            percent,
        })
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}%", self.profile_id, self.status, self.percent)?;
        if !self.message.is_empty() {
            write!(f, " ({})", self.message)?;
        }
        Ok(())
    }
}
