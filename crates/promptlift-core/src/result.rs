use crate::category::Category;
use serde::{Deserialize, Serialize};

/// Outcome of optimizing a single prompt, on either path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// The input prompt, unmodified
    pub original: String,
    pub optimized: String,
    /// Human-readable notes in insertion order
    pub improvements: Vec<String>,
    pub category: Category,
}
