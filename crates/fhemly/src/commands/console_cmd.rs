//! Handlers for the console operations: cmd, save, shutdown, restart, status.

use std::sync::Arc;

use tracing::{debug, info};

use fhemly_core::{
    CommandOutcome, ConsoleCommand, HttpConsole, RecoveryOutcome, RecoveryPhase, status_text,
};

use crate::cli::{CmdArgs, GlobalOpts, SaveArgs};
use crate::error::CliError;
use crate::output;
use crate::surface::CliSurface;

use super::util;

fn check(command: &ConsoleCommand, outcome: &CommandOutcome) -> Result<(), CliError> {
    match outcome {
        CommandOutcome::Failed(failure) => Err(CliError::command_failed(
            command.failure_message(),
            failure,
        )),
        CommandOutcome::Empty | CommandOutcome::Text(_) => Ok(()),
    }
}

/// Blank command text is a silent no-op, as in the console's command field.
pub async fn submit(console: &HttpConsole, args: CmdArgs) -> Result<(), CliError> {
    let command = args.words.join(" ");
    let Some(outcome) = console.submit(&command).await else {
        debug!("blank command ignored");
        return Ok(());
    };
    check(&ConsoleCommand::Raw(command), &outcome)
}

/// Save, submitting `--pending` first. A failed pending command stops
/// the save.
pub async fn save(console: &HttpConsole, args: SaveArgs) -> Result<(), CliError> {
    if let Some(pending) = args.pending {
        if let Some(outcome) = console.submit(&pending).await {
            check(&ConsoleCommand::Raw(pending), &outcome)?;
        }
    }
    let outcome = console.save_config(None).await;
    check(&ConsoleCommand::Save, &outcome)
}

pub async fn shutdown(console: &HttpConsole, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm("Shut the server down?", "shutdown", global.yes)? {
        return Ok(());
    }
    let outcome = console.shutdown().await;
    check(&ConsoleCommand::Shutdown, &outcome)
}

pub async fn restart(
    console: &HttpConsole,
    surface: &Arc<CliSurface>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !util::confirm("Restart the server?", "restart", global.yes)? {
        return Ok(());
    }

    let mut phase = console.subscribe_phase();
    let progress = Arc::clone(surface);
    let watcher = tokio::spawn(async move {
        while phase.changed().await.is_ok() {
            let current = *phase.borrow_and_update();
            if let RecoveryPhase::Polling { attempt } = current {
                progress.set_attempt(attempt);
            }
        }
    });

    let outcome = console.run_recovery().await;
    watcher.abort();

    match outcome {
        RecoveryOutcome::Reloaded { probes } => {
            info!(probes, "server restarted");
            Ok(())
        }
        RecoveryOutcome::Abandoned { probes } => Err(CliError::RestartAbandoned { probes }),
    }
}

pub async fn status(console: &HttpConsole, global: &GlobalOpts) -> Result<(), CliError> {
    let version = console.server_version().await?;
    output::print_output(&status_text(&version), global.quiet);
    Ok(())
}
