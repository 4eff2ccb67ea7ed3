/// Truncate a string for display (Unicode-safe)
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Case-insensitive substring test against an already lower-cased haystack.
pub(crate) fn contains_any(lower: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_str_counts_chars_not_bytes() {
        assert_eq!(truncate_str("héllo", 2), "hé");
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("", 3), "");
    }
}
