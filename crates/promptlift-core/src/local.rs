//! Deterministic optimizer used when no model is reachable.

use crate::analyzer::Analyzer;
use crate::category::Category;
use crate::result::OptimizationResult;
use std::sync::LazyLock;

/// Only the first few suggestions make it into the improvements list.
const MAX_LOCAL_SUGGESTIONS: usize = 3;

const ISSUE_PREFIX: &str = "fix: ";
const SUGGESTION_PREFIX: &str = "suggest: ";

/// Reported when the analyzer finds nothing to improve.
const POSITIVE_FEEDBACK: [&str; 3] = [
    "prompt is well structured",
    "contains a concrete description",
    "keep iterating to refine the result",
];

const HIGH_LEVEL_CLOSING: &str =
    "suggest: add a description of the core features for a better starting point";
const DETAILED_CLOSING: &str =
    "suggest: change only one or two elements at a time for precise control";

/// Composes analyzer output into an [`OptimizationResult`].
#[derive(Debug, Clone)]
pub struct LocalOptimizer<'a> {
    analyzer: Analyzer<'a>,
}

impl Default for LocalOptimizer<'static> {
    fn default() -> Self {
        Self::new(Analyzer::default())
    }
}

impl<'a> LocalOptimizer<'a> {
    pub fn new(analyzer: Analyzer<'a>) -> Self {
        Self { analyzer }
    }

    /// Never fails. Blank input yields a `general` result with an empty
    /// rewrite; callers that need a non-empty prompt must check first.
    pub fn optimize(&self, prompt: &str) -> OptimizationResult {
        let category = self.analyzer.detect_category(prompt);
        let analysis = self.analyzer.analyze(prompt);
        let optimized = self.analyzer.augment(prompt, category);

        let mut improvements: Vec<String> = analysis
            .issues
            .iter()
            .map(|issue| format!("{}{}", ISSUE_PREFIX, issue))
            .chain(
                analysis
                    .suggestions
                    .iter()
                    .take(MAX_LOCAL_SUGGESTIONS)
                    .map(|suggestion| format!("{}{}", SUGGESTION_PREFIX, suggestion)),
            )
            .collect();

        if improvements.is_empty() {
            improvements.extend(POSITIVE_FEEDBACK.iter().map(|s| s.to_string()));
        }

        let lower = prompt.to_lowercase();
        match category {
            Category::HighLevel
                if !lower.contains("features") && !lower.contains("functionality") =>
            {
                improvements.push(HIGH_LEVEL_CLOSING.to_string());
            }
            Category::Detailed => improvements.push(DETAILED_CLOSING.to_string()),
            _ => {}
        }

        OptimizationResult {
            original: prompt.to_string(),
            optimized,
            improvements,
            category,
        }
    }
}

static STANDARD: LazyLock<LocalOptimizer<'static>> = LazyLock::new(LocalOptimizer::default);

/// Optimize with the standard lexicon.
pub fn optimize_locally(prompt: &str) -> OptimizationResult {
    STANDARD.optimize(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marathon_prompt_is_high_level_and_gets_design_clause() {
        let result = optimize_locally("An app for marathon runners");
        assert_eq!(result.category, Category::HighLevel);
        assert_eq!(result.original, "An app for marathon runners");
        assert!(result
            .optimized
            .starts_with("An app for marathon runners with a modern, clean design"));
        assert_eq!(
            result.improvements.last().map(String::as_str),
            Some(HIGH_LEVEL_CLOSING)
        );
    }

    #[test]
    fn high_level_with_features_skips_closing_note() {
        let result = optimize_locally("A platform with features for sharing recipes");
        assert_eq!(result.category, Category::HighLevel);
        assert!(!result
            .improvements
            .contains(&HIGH_LEVEL_CLOSING.to_string()));
    }

    #[test]
    fn issues_are_prefixed_and_suggestions_capped() {
        let prompt = "make it good and nice and better then improve the whole thing plus more";
        let result = optimize_locally(prompt);
        let fixes = result
            .improvements
            .iter()
            .filter(|i| i.starts_with(ISSUE_PREFIX))
            .count();
        let suggestions = result
            .improvements
            .iter()
            .filter(|i| i.starts_with(SUGGESTION_PREFIX))
            .count();
        // good, nice, better, improve + multi-action
        assert_eq!(fixes, 5);
        assert_eq!(suggestions, MAX_LOCAL_SUGGESTIONS);
        assert_eq!(result.improvements[0], "fix: vague term: \"good\"");
    }

    #[test]
    fn clean_prompt_gets_positive_feedback() {
        let result = optimize_locally("On the profile screen, use a bold navigation bar");
        assert_eq!(result.category, Category::Detailed);
        assert_eq!(
            &result.improvements[..3],
            &POSITIVE_FEEDBACK.map(String::from)
        );
        assert_eq!(result.improvements[3], DETAILED_CLOSING);
    }

    #[test]
    fn detailed_always_ends_with_focus_note() {
        let result = optimize_locally("Make the homepage better");
        assert_eq!(result.category, Category::Detailed);
        assert!(result
            .improvements
            .contains(&"fix: vague term: \"better\"".to_string()));
        assert_eq!(
            result.improvements.last().map(String::as_str),
            Some(DETAILED_CLOSING)
        );
    }

    #[test]
    fn improvements_are_never_empty() {
        for prompt in ["", "   ", "x", "Change the colors to blue", "A modern vibe"] {
            let result = optimize_locally(prompt);
            assert!(!result.improvements.is_empty(), "prompt {prompt:?}");
        }
    }

    #[test]
    fn empty_prompt_is_general_and_empty() {
        let result = optimize_locally("");
        assert_eq!(result.category, Category::General);
        assert_eq!(result.optimized, "");
        assert_eq!(result.original, "");
    }

    #[test]
    fn original_is_preserved_byte_for_byte() {
        let prompt = "  Change the colors to blue\n";
        let result = optimize_locally(prompt);
        assert_eq!(result.original, prompt);
        assert!(result.optimized.starts_with("Change the colors to blue Ensure"));
    }

    #[test]
    fn long_prompt_always_mentions_length() {
        let prompt = format!("A website {}", "lorem ".repeat(1000));
        let result = optimize_locally(&prompt);
        assert!(result
            .improvements
            .iter()
            .any(|i| i.contains("too long")));
    }
}
