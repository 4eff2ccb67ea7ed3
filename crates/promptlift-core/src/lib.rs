//! Core domain model for promptlift.
//!
//! Everything in this crate is pure and synchronous: the word lists, the
//! heuristic analyzer and the local optimizer never touch the network.

pub mod analyzer;
pub mod category;
pub mod guide;
pub mod lexicon;
pub mod local;
pub mod result;
pub mod util;

pub use analyzer::{Analysis, Analyzer};
pub use category::Category;
pub use lexicon::Lexicon;
pub use local::{optimize_locally, LocalOptimizer};
pub use result::OptimizationResult;
