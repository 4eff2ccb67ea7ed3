//! Heuristic prompt analysis
//!
//! Fast, text-only checks that classify a prompt and flag common weaknesses:
//! - Category detection by keyword set (fixed priority)
//! - Vague wording and overloaded multi-step requests
//! - Missing UI vocabulary, mood adjectives or a concrete location
//!
//! Nothing here keeps state between calls; an [`Analyzer`] borrows its
//! [`Lexicon`] and compiles the connector pattern once up front.

use crate::category::Category;
use crate::lexicon::Lexicon;
use crate::util::contains_any;
use regex::Regex;

/// Prompts longer than this (in characters) tend to drop components.
pub const MAX_PROMPT_CHARS: usize = 5000;

/// More connector words than this suggests several changes in one request.
const MAX_CONNECTORS: usize = 2;

/// Minimum lower-cased length before the UI vocabulary hint applies.
const UI_VOCAB_MIN_CHARS: usize = 50;

/// Minimum lower-cased length before the location hint applies.
const LOCATION_MIN_CHARS: usize = 30;

const VAGUE_SUGGESTION: &str = "replace vague terms with a concrete description";
const MULTI_ACTION_ISSUE: &str = "may contain too many change requests";
const MULTI_ACTION_SUGGESTION: &str =
    "split the changes into steps, focusing on one or two adjustments at a time";
const LENGTH_ISSUE: &str = "prompt is too long (over 5000 characters)";
const LENGTH_SUGGESTION: &str = "shorten the prompt and iterate in several passes";
const UI_VOCAB_SUGGESTION: &str =
    "use UI/UX terminology such as \"navigation bar\" or \"call-to-action\"";
const ADJECTIVE_SUGGESTION: &str =
    "add adjectives that set the mood of the app, such as \"modern\" or \"minimalist\"";
const LOCATION_SUGGESTION: &str =
    "name a concrete location, such as \"On the homepage\" or \"In the header\"";

const HIGH_LEVEL_CLAUSE: &str =
    " with a modern, clean design featuring intuitive navigation and clear call-to-action elements.";
const DETAILED_CLAUSE: &str =
    " Use a clean, professional style with consistent spacing and typography.";
const THEMING_CLAUSE: &str =
    " Ensure all elements maintain visual consistency and accessibility standards.";

/// Issues and suggestions found in a prompt, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.suggestions.is_empty()
    }
}

/// Runs the category and quality rules against one [`Lexicon`].
#[derive(Debug, Clone)]
pub struct Analyzer<'a> {
    lexicon: &'a Lexicon,
    connectors: Option<Regex>,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new(Lexicon::standard())
    }
}

impl<'a> Analyzer<'a> {
    /// Compiles the connector pattern from `lexicon`.
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            connectors: connector_pattern(lexicon.connector_words),
        }
    }

    /// Classify a prompt.
    ///
    /// A prompt may hit several keyword sets at once, so the order matters:
    /// theming wins over detailed, which wins over high-level.
    pub fn detect_category(&self, prompt: &str) -> Category {
        let lower = prompt.to_lowercase();

        if contains_any(&lower, self.lexicon.theming_keywords) {
            return Category::Theming;
        }
        if contains_any(&lower, self.lexicon.detailed_keywords) {
            return Category::Detailed;
        }
        if contains_any(&lower, self.lexicon.high_level_keywords) {
            return Category::HighLevel;
        }
        Category::General
    }

    /// Run every rule. Rules are independent and never short-circuit.
    pub fn analyze(&self, prompt: &str) -> Analysis {
        let lex = self.lexicon;
        let lower = prompt.to_lowercase();
        let lower_len = lower.chars().count();
        let mut analysis = Analysis::default();

        // Vagueness: one issue per matched word
        for word in lex.vague_words {
            if lower.contains(word) {
                analysis.issues.push(format!("vague term: \"{}\"", word));
                analysis.suggestions.push(VAGUE_SUGGESTION.to_string());
            }
        }

        if self.count_connectors(&lower) > MAX_CONNECTORS {
            analysis.issues.push(MULTI_ACTION_ISSUE.to_string());
            analysis.suggestions.push(MULTI_ACTION_SUGGESTION.to_string());
        }

        if prompt.chars().count() > MAX_PROMPT_CHARS {
            analysis.issues.push(LENGTH_ISSUE.to_string());
            analysis.suggestions.push(LENGTH_SUGGESTION.to_string());
        }

        if !contains_any(&lower, lex.ui_vocabulary) && lower_len > UI_VOCAB_MIN_CHARS {
            analysis.suggestions.push(UI_VOCAB_SUGGESTION.to_string());
        }

        if !contains_any(&lower, lex.vibe_adjectives) && !lower.contains("style") {
            analysis.suggestions.push(ADJECTIVE_SUGGESTION.to_string());
        }

        if !contains_any(&lower, lex.location_words) && lower_len > LOCATION_MIN_CHARS {
            analysis.suggestions.push(LOCATION_SUGGESTION.to_string());
        }

        analysis
    }

    /// Whole-word occurrences of connector words, summed across the list.
    /// "brand" or "android" never count as "and".
    fn count_connectors(&self, lower: &str) -> usize {
        self.connectors
            .as_ref()
            .map_or(0, |re| re.find_iter(lower).count())
    }

    /// Append the canned clause for `category` to the trimmed prompt, unless
    /// the prompt already covers it.
    pub fn augment(&self, prompt: &str, category: Category) -> String {
        let trimmed = prompt.trim();
        let lower = trimmed.to_lowercase();
        let lacks = |a: &str, b: &str| !lower.contains(a) && !lower.contains(b);

        let clause = match category {
            Category::HighLevel if lacks("with", "featuring") => HIGH_LEVEL_CLAUSE,
            Category::Detailed if lacks("style", "design") => DETAILED_CLAUSE,
            Category::Theming if lacks("ensure", "consistent") => THEMING_CLAUSE,
            _ => "",
        };

        format!("{}{}", trimmed, clause)
    }
}

/// `\b(?:and|also|...)\b` with ASCII word boundaries. `None` for an empty list.
fn connector_pattern(words: &[&str]) -> Option<Regex> {
    if words.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    Regex::new(&format!(r"(?i-u)\b(?:{})\b", alternatives.join("|"))).ok()
}
