//! Pinned generation parameters for the optimizer model.

/// Model identifier sent with every request
pub const MODEL_ID: &str = "meta/llama-3.1-70b-instruct";

/// Low temperature keeps rewrites close to the input
pub const TEMPERATURE: f64 = 0.2;

/// Output ceiling; a rewritten prompt plus notes fits comfortably
pub const MAX_TOKENS: u32 = 900;

/// Upper bound on improvement notes kept from a model reply
pub const MAX_IMPROVEMENTS: usize = 12;
