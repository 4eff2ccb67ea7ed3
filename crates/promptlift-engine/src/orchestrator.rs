//! Two-tier optimization: model first, local heuristics on any failure.

use crate::error::{FailureKind, RemoteError};
use crate::llm::client::{RemoteOptimizer, RemoteSettings};
use promptlift_core::util::truncate_str;
use promptlift_core::{LocalOptimizer, OptimizationResult};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Upper bound on the failure reason handed back to callers
pub const MAX_FALLBACK_REASON_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationPath {
    Remote,
    Local,
}

impl OptimizationPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationPath::Remote => "remote",
            OptimizationPath::Local => "local",
        }
    }
}

/// Why the remote result was replaced by the local one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fallback {
    pub kind: FailureKind,
    pub reason: String,
}

impl Fallback {
    fn new(kind: FailureKind, reason: &str) -> Self {
        Self {
            kind,
            reason: truncate_str(reason, MAX_FALLBACK_REASON_CHARS).to_string(),
        }
    }

    fn cancelled() -> Self {
        Self::new(
            FailureKind::Cancelled,
            "remote optimization was cancelled before it completed",
        )
    }
}

impl From<RemoteError> for Fallback {
    fn from(err: RemoteError) -> Self {
        Self::new(err.kind(), &err.to_string())
    }
}

/// Tagged outcome of [`Optimizer::optimize`]. The result is always usable;
/// `fallback` is set only when the remote path was tried and failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimization {
    pub result: OptimizationResult,
    pub path: OptimizationPath,
    pub fallback: Option<Fallback>,
}

impl Optimization {
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Optimizer {
    remote: Option<RemoteOptimizer>,
    local: LocalOptimizer<'static>,
}

impl Optimizer {
    pub fn new(remote: Option<RemoteOptimizer>) -> Self {
        Self {
            remote,
            local: LocalOptimizer::default(),
        }
    }

    /// Heuristics only; the network is never touched.
    pub fn local_only() -> Self {
        Self::new(None)
    }

    pub fn from_settings(settings: Option<RemoteSettings>) -> Result<Self, RemoteError> {
        let remote = settings.map(RemoteOptimizer::new).transpose()?;
        Ok(Self::new(remote))
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn optimize(&self, prompt: &str) -> Optimization {
        self.optimize_with_cancel(prompt, &CancellationToken::new())
            .await
    }

    /// Like [`optimize`](Self::optimize), but a cancelled token abandons the
    /// in-flight remote call and degrades to the local path.
    pub async fn optimize_with_cancel(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Optimization {
        let Some(remote) = &self.remote else {
            tracing::debug!("no remote optimizer configured, using local heuristics");
            return self.local(prompt, None);
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Fallback::cancelled()),
            res = remote.optimize(prompt) => res.map_err(Fallback::from),
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    path = "remote",
                    category = %result.category,
                    improvements = result.improvements.len(),
                    "prompt optimized"
                );
                Optimization {
                    result,
                    path: OptimizationPath::Remote,
                    fallback: None,
                }
            }
            Err(fallback) => {
                tracing::warn!(
                    kind = %fallback.kind,
                    reason = %fallback.reason,
                    "remote optimization failed, falling back to local heuristics"
                );
                self.local(prompt, Some(fallback))
            }
        }
    }

    fn local(&self, prompt: &str, fallback: Option<Fallback>) -> Optimization {
        let result = self.local.optimize(prompt);
        tracing::info!(
            path = "local",
            category = %result.category,
            improvements = result.improvements.len(),
            "prompt optimized"
        );
        Optimization {
            result,
            path: OptimizationPath::Local,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlift_core::Category;

    #[tokio::test]
    async fn local_only_never_records_fallback() {
        let optimizer = Optimizer::local_only();
        let outcome = optimizer.optimize("An app for marathon runners").await;
        assert_eq!(outcome.path, OptimizationPath::Local);
        assert!(outcome.fallback.is_none());
        assert_eq!(outcome.result.category, Category::HighLevel);
    }

    #[tokio::test]
    async fn missing_key_degrades_with_config_reason() {
        let settings = RemoteSettings::new("http://127.0.0.1:9/v1/chat/completions", None);
        let optimizer = Optimizer::from_settings(Some(settings)).unwrap();
        let outcome = optimizer.optimize("Change the colors to blue").await;
        assert_eq!(outcome.path, OptimizationPath::Local);
        let fallback = outcome.fallback.expect("fallback recorded");
        assert_eq!(fallback.kind, FailureKind::Config);
        assert!(fallback.reason.contains("no API key"));
        assert_eq!(outcome.result.category, Category::Theming);
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_remote() {
        let settings = RemoteSettings::new(
            "http://127.0.0.1:9/v1/chat/completions",
            Some("key".to_string()),
        );
        let optimizer = Optimizer::from_settings(Some(settings)).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let outcome = optimizer.optimize_with_cancel("A todo app", &token).await;
        assert_eq!(outcome.path, OptimizationPath::Local);
        assert_eq!(
            outcome.fallback.map(|f| f.kind),
            Some(FailureKind::Cancelled)
        );
    }

    #[test]
    fn fallback_reason_is_bounded() {
        let err = RemoteError::Upstream("x".repeat(2_000));
        let fallback = Fallback::from(err);
        assert_eq!(fallback.kind, FailureKind::Upstream);
        assert_eq!(fallback.reason.chars().count(), MAX_FALLBACK_REASON_CHARS);
    }
}
