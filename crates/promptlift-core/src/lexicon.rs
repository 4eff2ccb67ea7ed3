//! Word lists shared by every heuristic rule.
//!
//! All entries are lower-case; rules lower-case the prompt before matching.

/// Immutable vocabulary injected into the [`Analyzer`](crate::Analyzer).
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    pub high_level_keywords: &'static [&'static str],
    pub detailed_keywords: &'static [&'static str],
    pub theming_keywords: &'static [&'static str],
    pub vague_words: &'static [&'static str],
    /// Matched as whole words, never as substrings
    pub connector_words: &'static [&'static str],
    pub ui_vocabulary: &'static [&'static str],
    pub vibe_adjectives: &'static [&'static str],
    pub location_words: &'static [&'static str],
}

const HIGH_LEVEL_KEYWORDS: &[&str] = &["app for", "application", "website", "platform", "tool for"];

const DETAILED_KEYWORDS: &[&str] = &[
    "page",
    "screen",
    "component",
    "button",
    "header",
    "footer",
    "card",
    "modal",
];

const THEMING_KEYWORDS: &[&str] = &[
    "color",
    "theme",
    "style",
    "font",
    "background",
    "vibe",
    "modern",
    "minimal",
];

const VAGUE_WORDS: &[&str] = &["good", "nice", "better", "improve", "make it pretty"];

const CONNECTOR_WORDS: &[&str] = &["and", "also", "plus", "then"];

const UI_VOCABULARY: &[&str] = &[
    "navigation bar",
    "call-to-action button",
    "hero section",
    "card layout",
    "dropdown menu",
    "sidebar",
    "footer",
    "header",
    "modal dialog",
    "form field",
    "input group",
    "tab bar",
    "breadcrumb",
    "pagination",
];

const VIBE_ADJECTIVES: &[&str] = &[
    "vibrant",
    "minimalist",
    "modern",
    "elegant",
    "professional",
    "playful",
    "serious",
    "clean",
    "bold",
    "subtle",
    "luxurious",
    "friendly",
    "technical",
    "creative",
    "corporate",
];

const LOCATION_WORDS: &[&str] = &["page", "screen", "section", "on the", "in the"];

static STANDARD: Lexicon = Lexicon {
    high_level_keywords: HIGH_LEVEL_KEYWORDS,
    detailed_keywords: DETAILED_KEYWORDS,
    theming_keywords: THEMING_KEYWORDS,
    vague_words: VAGUE_WORDS,
    connector_words: CONNECTOR_WORDS,
    ui_vocabulary: UI_VOCABULARY,
    vibe_adjectives: VIBE_ADJECTIVES,
    location_words: LOCATION_WORDS,
};

impl Lexicon {
    /// The vocabulary derived from the style guide.
    pub fn standard() -> &'static Lexicon {
        &STANDARD
    }
}
