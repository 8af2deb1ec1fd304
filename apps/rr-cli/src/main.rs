//! # rr-cli
//!
//! `runrelay` — post-run queue notification for workflow pipelines.
//!
//! Invoked once by the job-completion hook:
//! - `runrelay notify` — verify the environment, wait for the provenance
//!   manifest, compose the notification, deliver it to the queue
//! - `runrelay check` — verify the queue client and credentials only
//!
//! Exits 0 when the notification is delivered; on abort the exit code and
//! the last diagnostic line identify the cause.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Post-run notification relay for workflow pipelines.
#[derive(Parser)]
#[command(name = "runrelay", version, about)]
struct Cli {
    /// Settings file (defaults to .runrelay.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose and deliver the completion notification for one run.
    Notify {
        /// Output location URI (local path or s3:// prefix).
        #[arg(long)]
        outdir: Option<String>,

        /// Queue endpoint URL.
        #[arg(long)]
        queue_url: Option<String>,

        /// Queue region.
        #[arg(long)]
        region: Option<String>,

        /// Upper bound on the manifest wait, in seconds.
        #[arg(long)]
        max_wait_secs: Option<u64>,

        /// Pause between manifest checks, in milliseconds.
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Main workflow script filename to look for in the manifest.
        #[arg(long)]
        main_script: Option<String>,
    },
    /// Verify the queue client and ambient credentials.
    Check,
}

fn main() {
    // Progress lines are the tool's only observability surface; they go to
    // stdout where the completion hook captures them.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let settings = match config::Settings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e:#}");
            // EX_USAGE: bad invocation, not a pipeline abort.
            std::process::exit(64);
        }
    };

    let code = match cli.command {
        Commands::Notify {
            outdir,
            queue_url,
            region,
            max_wait_secs,
            poll_interval_ms,
            main_script,
        } => commands::notify::execute(
            &settings,
            commands::notify::NotifyArgs {
                outdir,
                queue_url,
                region,
                max_wait_secs,
                poll_interval_ms,
                main_script,
            },
        ),
        Commands::Check => commands::check::execute(),
    };

    std::process::exit(code);
}
