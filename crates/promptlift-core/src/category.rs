use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification tag for a prompt.
///
/// The set is closed: anything outside these five literals normalizes to
/// [`Category::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// A whole app or site described from scratch
    HighLevel,
    /// An edit targeting a specific page or component
    Detailed,
    /// Incremental tweaks on a previous result
    Refinement,
    /// Colors, fonts and overall vibe
    Theming,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::HighLevel,
        Category::Detailed,
        Category::Refinement,
        Category::Theming,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::HighLevel => "high-level",
            Category::Detailed => "detailed",
            Category::Refinement => "refinement",
            Category::Theming => "theming",
            Category::General => "general",
        }
    }

    /// Map a label onto the closed set. Matching is exact.
    pub fn normalize(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == label)
            .unwrap_or(Category::General)
    }

    /// Normalize an untyped JSON value. Non-strings become `General`.
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::String(label)) => Self::normalize(label),
            _ => Category::General,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_keeps_every_known_label() {
        for category in Category::ALL {
            assert_eq!(Category::normalize(category.as_str()), category);
        }
    }

    #[test]
    fn normalize_rejects_unknown_and_case_variants() {
        assert_eq!(Category::normalize("styling"), Category::General);
        assert_eq!(Category::normalize("Theming"), Category::General);
        assert_eq!(Category::normalize(""), Category::General);
    }

    #[test]
    fn from_value_defaults_wrong_types_to_general() {
        assert_eq!(Category::from_value(None), Category::General);
        assert_eq!(Category::from_value(Some(&json!(3))), Category::General);
        assert_eq!(
            Category::from_value(Some(&json!(["theming"]))),
            Category::General
        );
        assert_eq!(
            Category::from_value(Some(&json!("refinement"))),
            Category::Refinement
        );
    }

    #[test]
    fn serializes_as_kebab_case_literal() {
        let encoded = serde_json::to_string(&Category::HighLevel).unwrap();
        assert_eq!(encoded, "\"high-level\"");
        let decoded: Category = serde_json::from_str("\"theming\"").unwrap();
        assert_eq!(decoded, Category::Theming);
    }
}
