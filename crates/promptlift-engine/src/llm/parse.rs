use super::models::MAX_IMPROVEMENTS;
use crate::error::RemoteError;
use promptlift_core::{Category, OptimizationResult};
use serde_json::Value;

/// Fields projected out of a model reply, before the original prompt is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDraft {
    pub optimized: String,
    pub improvements: Vec<String>,
    pub category: Category,
}

impl ModelDraft {
    pub fn into_result(self, original: &str) -> OptimizationResult {
        OptimizationResult {
            original: original.to_string(),
            optimized: self.optimized,
            improvements: self.improvements,
            category: self.category,
        }
    }
}

/// Slice from the first `{` to the last `}` of the trimmed text.
///
/// Models like to wrap JSON in prose or code fences; when no brace pair is
/// present the whole trimmed text is returned and left to the parser.
pub(crate) fn extract_json_slice(content: &str) -> &str {
    let trimmed = content.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse the model's free-form answer into a validated draft.
pub fn parse_reply(content: &str) -> Result<ModelDraft, RemoteError> {
    if content.trim().is_empty() {
        return Err(RemoteError::EmptyReply);
    }

    let value: Value =
        serde_json::from_str(extract_json_slice(content)).map_err(|_| RemoteError::MalformedJson)?;
    let object = value.as_object().ok_or(RemoteError::MalformedJson)?;

    let optimized = object
        .get("optimized")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if optimized.trim().is_empty() {
        return Err(RemoteError::IncompleteResult);
    }

    let improvements = match object.get("improvements") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .take(MAX_IMPROVEMENTS)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Ok(ModelDraft {
        optimized: optimized.to_string(),
        improvements,
        category: Category::from_value(object.get("category")),
    })
}
