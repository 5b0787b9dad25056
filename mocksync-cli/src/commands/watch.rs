//! `mocksync watch` — stream syncStatus signals to stdout.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::{ColoredString, Colorize};
use futures::StreamExt;

use mocksync_core::{StatusEvent, SyncStatus};

use super::{block_on, GlobalOpts};

/// Arguments for `mocksync watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Only show events for this profile id.
    #[arg(long)]
    pub profile: Option<String>,

    /// Exit after this many events.
    #[arg(long)]
    pub count: Option<usize>,

    /// Emit one JSON object per line.
    #[arg(long)]
    pub json: bool,
}

impl WatchArgs {
    pub fn run(self, opts: &GlobalOpts) -> Result<()> {
        if self.count == Some(0) {
            return Ok(());
        }
        block_on(async {
            let client = opts.connect().await?;
            let events = client
                .status_events()
                .await
                .context("failed to subscribe to syncStatus")?;
            futures::pin_mut!(events);

            let mut seen = 0usize;
            while let Some(event) = events.next().await {
                if !self.matches(&event) {
                    continue;
                }
                self.print(&event)?;
                seen += 1;
                if self.count.is_some_and(|count| seen >= count) {
                    break;
                }
            }
            Ok(())
        })
    }

    fn matches(&self, event: &StatusEvent) -> bool {
        self.profile
            .as_deref()
            .map_or(true, |profile| event.profile_id.0 == profile)
    }

    fn print(&self, event: &StatusEvent) -> Result<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string(event).context("failed to render JSON")?
            );
            return Ok(());
        }
        let stamp = Local::now().format("%H:%M:%S%.3f");
        print!(
            "[{stamp}] {} {} {:>3}%",
            event.profile_id.0.bold(),
            status_label(event.status),
            event.percent
        );
        if !event.message.is_empty() {
            print!(" {}", event.message.dimmed());
        }
        println!();
        Ok(())
    }
}

fn status_label(status: SyncStatus) -> ColoredString {
    let label = format!("{:<8}", status.to_string());
    match status {
        SyncStatus::Queued => label.normal(),
        SyncStatus::Running | SyncStatus::Progress => label.cyan(),
        SyncStatus::Done => label.green(),
        SyncStatus::Error => label.red(),
        SyncStatus::Aborted => label.yellow(),
    }
}
