//! tunesync CLI
//!
//! Sync a music library to an external device: transcode or copy audio,
//! convert tags, reconcile removed files and rewrite playlists.

mod cli;
mod config;
mod error;
mod prompt;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use tunesync_core::{SyncConfig, SyncOrchestrator};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let defaults = config::load_defaults(cli.config_file.as_deref())?;
    let sync_config = config::resolve(&cli, defaults)?;

    print_settings(&sync_config);

    if !sync_config.batch && !prompt::confirm("Do you want to continue?")? {
        return Err(CliError::user("Cancelled."));
    }

    // In batch mode the orchestrator auto-confirms and never calls back.
    let orchestrator = SyncOrchestrator::new(sync_config);
    let report = orchestrator.run(&prompt::InteractiveConfirm)?;

    println!();
    println!(
        "{} {} files checked, {} processed",
        "done:".green().bold(),
        report.files,
        report.processed
    );
    Ok(())
}

/// Log to stdout; `RUST_LOG` overrides, `--verbose` lowers the default
/// level to debug.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_settings(config: &SyncConfig) {
    println!("{}", "Settings:".bold());
    println!(
        "  {}: {}",
        "audio-src".dimmed(),
        config.audio_src.display().to_string().cyan()
    );
    println!(
        "  {}: {}",
        "audio-dest".dimmed(),
        config.audio_dest.display().to_string().cyan()
    );
    if let Some(playlist_src) = &config.playlist_src {
        println!(
            "  {}: {}",
            "playlist-src".dimmed(),
            playlist_src.display().to_string().cyan()
        );
    }
    println!("  {}: {}", "mode".dimmed(), config.mode.to_string().cyan());
    println!("  {}: {}", "jobs".dimmed(), config.jobs.to_string().cyan());
    if config.force {
        println!("  {}: process also up to date files", "force".dimmed());
    }
    println!();
}
