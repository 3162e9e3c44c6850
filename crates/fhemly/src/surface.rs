//! Terminal rendition of the console surface.
//!
//! Toasts go to stderr, response panels to stdout verbatim. Alerts are not
//! printed here: a failed command ends the process with a diagnostic
//! instead. The restart mask is a spinner.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::debug;

use fhemly_core::{Notice, Surface};

pub struct CliSurface {
    color: bool,
    quiet: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliSurface {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self {
            color,
            quiet,
            spinner: Mutex::new(None),
        }
    }

    /// Show the probe count next to the mask message.
    pub fn set_attempt(&self, attempt: u32) {
        if let Ok(guard) = self.spinner.lock() {
            if let Some(spinner) = guard.as_ref() {
                spinner.set_prefix(format!("probe {attempt}"));
            }
        }
    }

    fn finish_spinner(&self, message: Option<&str>) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        if let Some(spinner) = guard.take() {
            match message {
                Some(message) => spinner.finish_with_message(message.to_owned()),
                None => spinner.finish_and_clear(),
            }
        }
    }

    fn toast(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{} {}", "✓".green(), message.green());
        } else {
            eprintln!("✓ {message}");
        }
    }
}

impl Surface for CliSurface {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Toast { message } => self.toast(&message),
            Notice::Panel { body, .. } => {
                if !self.quiet {
                    let mut stdout = io::stdout().lock();
                    let _ = writeln!(stdout, "{}", body.trim_end_matches('\n'));
                }
            }
            Notice::Alert { message, .. } => debug!(%message, "alert left to the exit diagnostic"),
        }
    }

    fn mask(&self, message: &str) {
        let spinner = if self.quiet {
            ProgressBar::hidden()
        } else {
            let style = ProgressStyle::with_template("{spinner} {msg} {prefix:.dim} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let spinner = ProgressBar::new_spinner().with_style(style);
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        };
        spinner.set_message(message.to_owned());
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(spinner);
        }
    }

    fn unmask(&self) {
        self.finish_spinner(None);
    }

    fn reload(&self) {
        self.finish_spinner(Some("Server is back."));
    }
}
