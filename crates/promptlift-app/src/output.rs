//! Plain-text rendering for the CLI.

use promptlift_core::guide::Guide;
use promptlift_core::OptimizationResult;
use promptlift_engine::Fallback;
use std::fmt::Write;

pub fn render_result(result: &OptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Category: {}", result.category);
    let _ = writeln!(out);
    let _ = writeln!(out, "Optimized prompt:");
    for line in result.optimized.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Improvements:");
    for item in &result.improvements {
        let _ = writeln!(out, "  - {}", item);
    }
    out
}

/// One-line stderr note when the model path was abandoned.
pub fn fallback_note(fallback: &Fallback) -> String {
    format!(
        "note: model unavailable ({}): {}; showing the local result",
        fallback.kind, fallback.reason
    )
}

pub fn render_guide(guide: &Guide) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rules");
    for (i, rule) in guide.rules.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, rule.title);
        let _ = writeln!(out, "     {}", rule.description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Tips");
    for tip in guide.tips {
        let _ = writeln!(out, "  - {}: {}", tip.title, tip.content);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Examples");
    for example in guide.examples {
        let _ = writeln!(out, "  before: {}", example.before);
        let _ = writeln!(out, "  after:  {}", example.after);
        let _ = writeln!(out);
    }
    out
}
