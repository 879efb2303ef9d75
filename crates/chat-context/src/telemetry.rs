// chat-context/crates/chat-context/src/telemetry.rs

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable: engine events at
/// `info`, everything else at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "warn,chat_context=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Output goes to stderr; the CLI writes its
/// results to stdout. Returns `false` if a subscriber was already installed.
pub fn init_tracing() -> bool {
    let subscriber = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_second_install_is_refused() {
        init_tracing();
        assert!(!init_tracing());
    }
}
