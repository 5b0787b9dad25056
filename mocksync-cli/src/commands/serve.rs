//! `mocksync serve` — run the mock service in the foreground.

use anyhow::{Context, Result};

use super::GlobalOpts;

pub fn run(opts: &GlobalOpts) -> Result<()> {
    let config = opts.load_config()?;
    mocksync_daemon::start_blocking(config).context("mock sync service exited with error")
}
