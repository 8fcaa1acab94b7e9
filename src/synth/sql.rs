//! SQL text helpers
//!
//! Every quoted path segment and every literal in a generated statement goes
//! through these two functions; nothing else in the crate concatenates raw
//! user-influenced text into SQL.

/// Double-quote a path segment, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a predicate literal: numeric values pass through bare, anything
/// else is single-quoted with embedded quotes doubled
pub fn literal(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        value.to_string()
    } else {
        format!("'{}'", escape_in_literal(value))
    }
}

/// Double embedded single quotes for text spliced into an already-quoted
/// literal, e.g. a discovered key inside a pattern string
pub fn escape_in_literal(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("orders"), "\"orders\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_numeric_literal_unquoted() {
        assert_eq!(literal("42"), "42");
    }

    #[test]
    fn test_string_literal_escaped() {
        assert_eq!(literal("acme"), "'acme'");
        assert_eq!(literal("o'corp"), "'o''corp'");
        assert_eq!(literal(""), "''");
    }

    #[test]
    fn test_escape_in_literal() {
        assert_eq!(escape_in_literal("driver's_license"), "driver''s_license");
        assert_eq!(escape_in_literal("plain"), "plain");
    }
}
