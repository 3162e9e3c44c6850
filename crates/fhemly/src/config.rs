//! CLI configuration -- thin wrapper around `fhemly_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--url, --insecure, --timeout) and the restart flags.

use std::time::Duration;

use fhemly_core::ConsoleConfig;
use fhemly_core::config::DEFAULT_URL;

use crate::cli::{GlobalOpts, RestartArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fhemly_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Resolve the `ConsoleConfig` for this invocation.
///
/// Flag > env > profile > built-in default. Without any profile the
/// stock local endpoint is used, unless a profile was asked for by name.
pub fn resolve_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile {
            url: DEFAULT_URL.into(),
            ..Profile::default()
        },
    };

    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    Ok(fhemly_config::profile_to_console_config(&profile, &cfg.defaults)?)
}

/// Apply `fhemly restart` flags on top of a resolved config.
pub fn apply_restart_args(config: &mut ConsoleConfig, args: &RestartArgs) -> Result<(), CliError> {
    if let Some(max) = args.max_attempts {
        config.recovery.max_attempts = Some(max);
    }
    if let Some(secs) = args.deadline {
        config.recovery.deadline = Some(Duration::from_secs(secs));
    }
    if let Some(ms) = args.interval_ms {
        if ms == 0 {
            return Err(CliError::Validation {
                field: "interval-ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        config.recovery.interval = Duration::from_millis(ms);
    }
    Ok(())
}
