//! Subcommand implementations and the options they share.

pub mod config;
pub mod serve;
pub mod sync;
pub mod watch;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mocksync_daemon::paths::SYSTEM_BUS_ENV;
use mocksync_daemon::{DaemonError, MockConfig, SyncClient};

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Use the system bus instead of the session bus.
    #[arg(long, global = true)]
    pub system: bool,

    /// Read configuration from this file instead of ~/.mocksync/config.yaml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl GlobalOpts {
    /// Defaults < config file < `MOCKSYNC_SYSTEM_BUS` < `--system`.
    pub fn load_config(&self) -> Result<MockConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = MockConfig::load_from(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?;
                config.apply_env_value(std::env::var(SYSTEM_BUS_ENV).ok().as_deref());
                config
            }
            None => MockConfig::load().context("failed to load config")?,
        };
        if self.system {
            config.system_bus = true;
        }
        Ok(config)
    }

    pub async fn connect(&self) -> Result<SyncClient> {
        let config = self.load_config()?;
        let bus = if config.system_bus { "system" } else { "session" };
        SyncClient::connect(config.system_bus)
            .await
            .map_err(not_running_hint)
            .with_context(|| format!("failed to connect to the {bus} bus"))
    }
}

/// Drive a client future to completion on a single-threaded runtime.
pub fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(future)
}

pub(crate) fn not_running_hint(err: DaemonError) -> anyhow::Error {
    match err {
        err @ DaemonError::ServiceNotRunning { .. } => {
            anyhow::Error::new(err).context("start it with `mocksync serve`")
        }
        other => anyhow::Error::new(other),
    }
}
