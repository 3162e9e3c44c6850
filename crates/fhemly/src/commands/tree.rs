//! `fhemly tree`: the device tree as built for the console's tree pane.

use fhemly_core::HttpConsole;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(console: &HttpConsole, global: &GlobalOpts) -> Result<(), CliError> {
    let root = console.load_tree().await?;
    let out = output::render_tree(&global.output, &root);
    output::print_output(&out, global.quiet);
    Ok(())
}
