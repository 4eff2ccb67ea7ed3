//! The prompt style guide, as static reference data.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Tip {
    pub title: &'static str,
    pub content: &'static str,
}

pub const RULES: [Rule; 6] = [
    Rule {
        id: "clear-specific",
        title: "Be clear and specific",
        description: "Say exactly what should change and how. Avoid vague instructions and use precise descriptions.",
    },
    Rule {
        id: "one-thing",
        title: "One thing at a time",
        description: "Make one or two adjustments per prompt instead of changing everything at once.",
    },
    Rule {
        id: "focus-screen",
        title: "Focus on a screen",
        description: "Target a specific screen or component rather than describing the whole app in general terms.",
    },
    Rule {
        id: "use-adjectives",
        title: "Use adjectives",
        description: "Set the mood and style of the app with adjectives such as \"vibrant\" or \"minimalist\".",
    },
    Rule {
        id: "ui-keywords",
        title: "UI/UX keywords",
        description: "Use established terms such as \"navigation bar\", \"call-to-action button\" or \"card layout\".",
    },
    Rule {
        id: "specific-reference",
        title: "Reference elements precisely",
        description: "Point at elements exactly, e.g. \"the primary button on the sign-up page\" or \"the image in the hero section\".",
    },
];

pub const TIPS: [Tip; 5] = [
    Tip {
        title: "Start simple",
        content: "Begin with a short prompt, then refine and add detail step by step.",
    },
    Tip {
        title: "Don't mix concerns",
        content: "Keep layout changes and component changes in separate prompts.",
    },
    Tip {
        title: "Iterate",
        content: "Improve the result over several passes, each building on the last.",
    },
    Tip {
        title: "Watch the length",
        content: "Prompts over 5000 characters may cause components to be dropped.",
    },
    Tip {
        title: "Save progress",
        content: "Keep each successful result so you can compare and roll back.",
    },
];

/// A weak prompt next to a rewrite that follows the rules.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Example {
    pub before: &'static str,
    pub after: &'static str,
}

pub const EXAMPLES: [Example; 4] = [
    Example {
        before: "An app for marathon runners",
        after: "An app for marathon runners to engage with a community, find partners, get training advice, and find races near them. Use a vibrant and encouraging design style.",
    },
    Example {
        before: "Make the homepage better",
        after: "On the homepage, add a search bar to the header and increase the size of the primary call-to-action button. Use the brand's primary blue color for the button.",
    },
    Example {
        before: "Product page for tea store",
        after: "Product detail page for a Japandi-styled tea store. Sells herbal teas and ceramics. Use neutral, minimal colors with black buttons and soft, elegant typography.",
    },
    Example {
        before: "Change the colors to blue",
        after: "Update the theme to dark blue as the primary color. Ensure all buttons, links, and icons reflect this new color scheme consistently across all screens.",
    },
];

/// Rules, tips and examples bundled for display or JSON output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Guide {
    pub rules: &'static [Rule],
    pub tips: &'static [Tip],
    pub examples: &'static [Example],
}

pub fn guide() -> Guide {
    Guide {
        rules: &RULES,
        tips: &TIPS,
        examples: &EXAMPLES,
    }
}
