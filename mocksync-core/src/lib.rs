//! mocksync core library — domain types, profile fixtures, errors.
//!
//! - [`types`] — status codes, status events, profile ids
//! - [`fixture`] — built-in profile document and directory loading
//! - [`error`] — [`FixtureError`]

pub mod error;
pub mod fixture;
pub mod types;

pub use error::FixtureError;
pub use fixture::{Profile, ProfileSet, BUILTIN_PROFILE_ID, BUILTIN_PROFILE_XML};
pub use types::{ProfileId, StatusEvent, SyncStatus};
