/// Collapse every whitespace run (including NBSP and newlines) to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Key used for in-run deduplication and rule lookups: lower-cased, whitespace-collapsed.
pub fn normalized_key(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, normalized_key};

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc\u{a0}d  "), "a b c d");
    }

    #[test]
    fn key_ignores_case_and_spacing() {
        assert_eq!(normalized_key("Nový  iPhone"), normalized_key("nový iphone "));
        assert_eq!(normalized_key("ČEZ"), "čez");
    }
}
