//! Process-wide settings for the error core
//!
//! By default backtraces are not forced and the panic hook chains to the
//! one it replaces. Binaries override this by calling [`init`] early in
//! `main`, or by exporting the `GNOMESTACK_*` variables read by
//! [`CoreConfig::from_env`].

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;

/// Force backtrace capture for exception errors
pub const BACKTRACE_VAR: &str = "GNOMESTACK_BACKTRACE";

/// Install the failure-rendering panic hook on first raise
pub const PANIC_HOOK_VAR: &str = "GNOMESTACK_PANIC_HOOK";

/// Silence the panic hook for panics captured by a try-bridge
pub const QUIET_PANICS_VAR: &str = "GNOMESTACK_QUIET_PANICS";

static GLOBAL: OnceCell<CoreConfig> = OnceCell::new();

/// Settings that shape how failures are captured and raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Always capture a backtrace when wrapping a failure. When off, a
    /// backtrace is still kept if `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`
    /// enable one.
    pub capture_backtrace: bool,
    /// Install the panic hook that renders `Failure` payloads with their
    /// cause chain the first time a failure is raised.
    pub panic_hook: bool,
    /// Route hook output for panics captured by a try-bridge to `tracing`
    /// at debug level instead of stderr.
    pub quiet_captured_panics: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            capture_backtrace: false,
            panic_hook: true,
            quiet_captured_panics: true,
        }
    }
}

impl CoreConfig {
    /// Build a configuration from `GNOMESTACK_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capture_backtrace: flag(BACKTRACE_VAR).unwrap_or(defaults.capture_backtrace),
            panic_hook: flag(PANIC_HOOK_VAR).unwrap_or(defaults.panic_hook),
            quiet_captured_panics: flag(QUIET_PANICS_VAR)
                .unwrap_or(defaults.quiet_captured_panics),
        }
    }
}

fn flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(variable = name, value = other, "ignoring unrecognised flag value");
            None
        }
    }
}

/// Set the process-wide configuration.
///
/// Returns the rejected configuration if one was already set, either by an
/// earlier call or lazily by [`global`].
pub fn init(config: CoreConfig) -> std::result::Result<(), CoreConfig> {
    GLOBAL.set(config)
}

/// The process-wide configuration, loaded from the environment on first use
pub fn global() -> &'static CoreConfig {
    GLOBAL.get_or_init(CoreConfig::from_env)
}
