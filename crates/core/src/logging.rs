//! Tracing subscriber setup for binaries built on gnomestack

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Variable holding the `EnvFilter` directives
pub const LOG_FILTER_VAR: &str = "GNOMESTACK_LOG";

const DEFAULT_FILTER: &str = "info";

/// Initialize a stderr tracing subscriber.
///
/// Filter directives come from `GNOMESTACK_LOG`, falling back to `info`.
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR)
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init();
        assert!(init().is_err());
        tracing::info!("subscriber installed");
    }
}
