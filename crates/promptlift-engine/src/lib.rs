//! Remote optimization and graceful degradation for promptlift.
//!
//! [`llm`] talks to an OpenAI-compatible chat-completion endpoint;
//! [`orchestrator`] decides between that path and the local heuristics.

pub mod error;
pub mod llm;
pub mod orchestrator;

pub use error::{FailureKind, RemoteError};
pub use llm::client::{RemoteOptimizer, RemoteSettings, DEFAULT_ENDPOINT, REQUEST_TIMEOUT_SECS};
pub use orchestrator::{Fallback, Optimization, OptimizationPath, Optimizer};
