// ═══════════════════════════════════════════════════════════════════════════════
// PROMPTS
// ═══════════════════════════════════════════════════════════════════════════════

pub const OPTIMIZE_SYSTEM: &str = r#"You are a prompt optimization assistant.
Optimize the user prompt according to Google AI Stitch prompt best practices:
- be clear and specific
- one change at a time
- focus on a specific screen/section/component when relevant
- include UI/UX vocabulary (navigation bar, call-to-action button, hero section, card layout, etc.) when appropriate
- include vibe/style adjectives (modern, minimalist, vibrant, elegant, professional, etc.) when appropriate
- keep it concise; if the prompt is too broad, propose a focused, actionable version

Return ONLY strict JSON with the following schema:
{ "optimized": string, "improvements": string[], "category": "high-level"|"detailed"|"refinement"|"theming"|"general" }
Do not wrap it in markdown."#;

pub fn optimize_user(prompt: &str) -> String {
    format!("User prompt:\n{}", prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_embeds_prompt_verbatim() {
        assert_eq!(
            optimize_user("  An app\nfor runners "),
            "User prompt:\n  An app\nfor runners "
        );
    }

    #[test]
    fn system_prompt_lists_every_category() {
        for category in promptlift_core::Category::ALL {
            assert!(OPTIMIZE_SYSTEM.contains(&format!("\"{}\"", category.as_str())));
        }
        assert!(OPTIMIZE_SYSTEM.ends_with("Do not wrap it in markdown."));
    }
}
