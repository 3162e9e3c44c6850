mod cli;
mod commands;
mod config;
mod error;
mod output;
mod surface;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fhemly_core::HttpConsole;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::surface::CliSurface;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fhemly", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let mut console_config = config::resolve_console_config(&cli.global)?;
            if let Command::Restart(ref args) = cmd {
                config::apply_restart_args(&mut console_config, args)?;
            }

            let surface = Arc::new(CliSurface::new(
                output::should_color(&cli.global.color),
                cli.global.quiet,
            ));
            let console = HttpConsole::from_config(&console_config, surface.clone())?;

            tracing::debug!(command = ?cmd, url = %console_config.url, "dispatching command");
            commands::dispatch(cmd, &console, &surface, &cli.global).await
        }
    }
}
