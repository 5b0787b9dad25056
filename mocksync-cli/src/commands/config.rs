//! `mocksync config` — print the effective configuration.

use anyhow::{Context, Result};
use clap::Args;

use mocksync_daemon::paths::{BUS_NAME, INTERFACE_NAME, OBJECT_PATH};

use super::GlobalOpts;

/// Arguments for `mocksync config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ConfigArgs {
    pub fn run(self, opts: &GlobalOpts) -> Result<()> {
        let config = opts.load_config()?;
        let profiles = config
            .profile_set()
            .context("failed to load profile fixtures")?;
        let profile_ids: Vec<String> = profiles.ids().into_iter().map(|id| id.0).collect();

        if self.json {
            let payload = serde_json::json!({
                "bus_name": BUS_NAME,
                "object_path": OBJECT_PATH,
                "interface": INTERFACE_NAME,
                "config": config,
                "profiles": profile_ids,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to render JSON")?
            );
            return Ok(());
        }

        let bus = if config.system_bus { "system" } else { "session" };
        println!("bus:        {bus}");
        println!("name:       {BUS_NAME}");
        println!("path:       {OBJECT_PATH}");
        println!("interface:  {INTERFACE_NAME}");
        let s = &config.schedule;
        println!(
            "schedule:   queued {}ms, running {}ms, progress {}ms, done {}ms",
            s.queued_ms, s.running_ms, s.progress_ms, s.done_ms
        );
        println!("profiles:   {}", profile_ids.join(", "));
        Ok(())
    }
}
