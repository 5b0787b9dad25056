//! Mock `com.meego.msyncd` daemon: scripted status service + D-Bus binding.

pub mod bus;
mod client;
pub mod config;
mod error;
pub mod paths;
mod runtime;
pub mod schedule;
pub mod service;

pub use client::SyncClient;
pub use config::{MockConfig, ScheduleConfig};
pub use error::DaemonError;
pub use runtime::{run, start_blocking};
pub use schedule::Scheduler;
pub use service::{MockSyncService, ABORT_MESSAGE, SYNC_SCRIPT};
