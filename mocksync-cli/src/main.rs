//! mocksync — fake `com.meego.msyncd` sync daemon for client test suites.
//!
//! # Usage
//!
//! ```text
//! mocksync serve [--system] [--config <path>]
//! mocksync start <profile-id>
//! mocksync abort <profile-id>
//! mocksync running [--json]
//! mocksync profile <profile-id>
//! mocksync watch [--profile <id>] [--count <n>]
//! mocksync config [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    config::ConfigArgs,
    sync::{ProfileArgs, RunningArgs},
    watch::WatchArgs,
    GlobalOpts,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mocksync",
    version,
    about = "Scripted stand-in for the com.meego.msyncd sync daemon",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Own the bus name and serve the mock until Ctrl-C.
    Serve,

    /// Ask the running mock to start a sync (plays the scripted status sequence).
    Start(ProfileArgs),

    /// Ask the running mock to abort a sync.
    Abort(ProfileArgs),

    /// List profile ids the running mock considers in progress.
    Running(RunningArgs),

    /// Print the profile document served by the running mock.
    Profile(ProfileArgs),

    /// Print syncStatus signals as they arrive.
    Watch(WatchArgs),

    /// Show the effective configuration without touching the bus.
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let opts = cli.opts;
    match cli.command {
        Commands::Serve => commands::serve::run(&opts),
        Commands::Start(args) => args.start(&opts),
        Commands::Abort(args) => args.abort(&opts),
        Commands::Running(args) => args.run(&opts),
        Commands::Profile(args) => args.profile(&opts),
        Commands::Watch(args) => args.run(&opts),
        Commands::Config(args) => args.run(&opts),
    }
}
