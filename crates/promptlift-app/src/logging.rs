//! Structured logging to stderr.

use tracing_subscriber::EnvFilter;

/// Overrides the default filter, e.g. `PROMPTLIFT_LOG=promptlift_engine=debug`.
pub const LOG_ENV: &str = "PROMPTLIFT_LOG";

/// Install the global fmt subscriber. `default_directive` applies when
/// `PROMPTLIFT_LOG` is unset or unparseable. Repeated calls are ignored.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Default verbosity per command: the server narrates requests, one-shot
/// commands only surface warnings.
pub fn default_directive(verbose: bool, serving: bool) -> &'static str {
    match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_always_wins() {
        assert_eq!(default_directive(true, false), "debug");
        assert_eq!(default_directive(true, true), "debug");
        assert_eq!(default_directive(false, true), "info");
        assert_eq!(default_directive(false, false), "warn");
    }
}
