//! Turning resolved configuration into an optimizer.

use promptlift_adapters::config::{Config, API_KEY_ENV};
use promptlift_engine::{Fallback, Optimizer};

/// Build the optimizer for `config`. Never fails: when the remote client
/// can't be set up, the local optimizer is returned along with the reason.
pub fn optimizer_for(config: &Config) -> (Optimizer, Option<Fallback>) {
    let remote = config.remote_settings();
    if remote.is_none() {
        tracing::info!(
            "no usable model configuration (set {} or run `promptlift setup`), using local heuristics",
            API_KEY_ENV
        );
    }

    match Optimizer::from_settings(remote) {
        Ok(optimizer) => (optimizer, None),
        Err(err) => {
            tracing::warn!("couldn't initialize the remote optimizer: {}", err);
            (Optimizer::local_only(), Some(Fallback::from(err)))
        }
    }
}
