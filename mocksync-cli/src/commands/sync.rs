//! `mocksync start|abort|running|profile` — calls against the running mock.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use mocksync_core::ProfileId;
use super::{block_on, not_running_hint, GlobalOpts};

/// A single profile id argument.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Profile identifier, e.g. an account id such as `45`.
    pub profile_id: String,
}

impl ProfileArgs {
    fn id(&self) -> ProfileId {
        ProfileId::from(self.profile_id.as_str())
    }

    pub fn start(self, opts: &GlobalOpts) -> Result<()> {
        block_on(async {
            let client = opts.connect().await?;
            let accepted = client
                .start_sync(&self.id())
                .await
                .map_err(not_running_hint)
                .context("startSync failed")?;
            if accepted {
                println!("{} sync started for {}", "✓".green(), self.profile_id.bold());
            } else {
                println!("{} sync rejected for {}", "✗".red(), self.profile_id.bold());
            }
            Ok(())
        })
    }

    pub fn abort(self, opts: &GlobalOpts) -> Result<()> {
        block_on(async {
            let client = opts.connect().await?;
            client
                .abort_sync(&self.id())
                .await
                .map_err(not_running_hint)
                .context("abortSync failed")?;
            println!("{} abort requested for {}", "✓".yellow(), self.profile_id.bold());
            Ok(())
        })
    }

    pub fn profile(self, opts: &GlobalOpts) -> Result<()> {
        block_on(async {
            let client = opts.connect().await?;
            let document = client
                .sync_profile(&self.id())
                .await
                .map_err(not_running_hint)
                .context("syncProfile failed")?;
            print!("{document}");
            if !document.ends_with('\n') {
                println!();
            }
            Ok(())
        })
    }
}

/// Arguments for `mocksync running`.
#[derive(Args, Debug)]
pub struct RunningArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunningArgs {
    pub fn run(self, opts: &GlobalOpts) -> Result<()> {
        block_on(async {
            let client = opts.connect().await?;
            let running = client
                .running_syncs()
                .await
                .map_err(not_running_hint)
                .context("runningSyncs failed")?;

            if self.json {
                let ids: Vec<&str> = running.iter().map(|id| id.0.as_str()).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ids).context("failed to render JSON")?
                );
                return Ok(());
            }

            if running.is_empty() {
                println!("No syncs running.");
            }
            for id in running {
                println!("{} {}", "●".cyan(), id);
            }
            Ok(())
        })
    }
}
