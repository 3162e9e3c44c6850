//! `fhemly-tui`: terminal console for a FHEM server.
//!
//! Built on [ratatui](https://ratatui.rs): a device tree, a detail panel,
//! and a command field that sends anything you type to the server's
//! command endpoint. Restarts are followed through until the server
//! answers again, then the whole console reloads.
//!
//! Logs go to a file (default `/tmp/fhemly-tui.log`) so they never land on
//! the terminal.

mod action;
mod app;
mod component;
mod event;
mod loader;
mod screens;
mod surface;
#[cfg(test)]
mod testing;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use fhemly_config::Profile;
use fhemly_core::ConsoleConfig;
use fhemly_core::config::DEFAULT_URL;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal console for FHEM home automation servers.
#[derive(Parser, Debug)]
#[command(name = "fhemly-tui", version, about)]
struct Cli {
    /// Command endpoint URL (e.g., http://fhem.local:8083/fhem)
    #[arg(short = 'u', long, env = "FHEMLY_URL")]
    url: Option<String>,

    /// Profile from the shared config file
    #[arg(short = 'p', long, env = "FHEMLY_PROFILE")]
    profile: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/fhemly-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the guard for the whole run so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("fhemly_tui={level},fhemly_core={level},fhemly_api={level}"))
    });

    let dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("fhemly-tui.log"));

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Flags > profile from the config file > stock local endpoint.
fn resolve_config(cli: &Cli) -> Result<ConsoleConfig> {
    let cfg = fhemly_config::load_config_or_default();
    let name = cfg.active_profile_name(cli.profile.as_deref());

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => return Err(eyre!("unknown profile '{name}'")),
        None => Profile {
            url: DEFAULT_URL.into(),
            ..Profile::default()
        },
    };

    if let Some(url) = &cli.url {
        profile.url.clone_from(url);
    }
    if cli.insecure {
        profile.insecure = Some(true);
    }

    Ok(fhemly_config::profile_to_console_config(&profile, &cfg.defaults)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;
    info!(url = %config.url, "starting fhemly-tui");

    let mut app = App::new(&config)?;
    app.run().await
}
