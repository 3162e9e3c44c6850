//! Command dispatch: bridges CLI args -> console operations -> output.

pub mod config_cmd;
pub mod console_cmd;
pub mod tree;
pub mod util;

use std::sync::Arc;

use fhemly_core::HttpConsole;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::surface::CliSurface;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &HttpConsole,
    surface: &Arc<CliSurface>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Cmd(args) => console_cmd::submit(console, args).await,
        Command::Save(args) => console_cmd::save(console, args).await,
        Command::Shutdown => console_cmd::shutdown(console, global).await,
        Command::Restart(_) => console_cmd::restart(console, surface, global).await,
        Command::Status => console_cmd::status(console, global).await,
        Command::Tree => tree::handle(console, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
