//! Character classes and rule names used by auto-repair.

/// Whitespace between tokens. Wider than the JSON grammar: any Unicode
/// whitespace and the byte order mark are skipped.
pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Quote characters accepted in place of `"` around object keys.
pub(crate) fn is_quote_like(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}')
}

/// Characters that end a value inside a container.
pub(crate) fn is_value_terminator(c: char) -> bool {
    matches!(c, ',' | '}' | ']')
}

/// The repairs applied by auto-fix mode, named for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Repair {
    /// Value missing before `,`, `}` or `]`: `null` is synthesized.
    MissingValue,
    /// Value that starts like no JSON value is read as a string.
    BareString,
    /// Extra quote right after an empty key's opening quote.
    DoubledKeyQuote,
    /// Characters between a key's closing quote and `:` are dropped.
    KeyTrailingGarbage,
    /// `:` reached inside a key: the closing quote is synthesized.
    UnclosedKey,
    /// Key started without a quote: the opening quote is synthesized.
    UnquotedKey,
    /// `:` reached where a key was expected: an empty key is synthesized.
    MissingKey,
    /// Key followed by `,` or `}`: `:` and `null` are synthesized.
    KeyWithoutValue,
    /// Raw newline in a key is dropped.
    NewlineInKey,
    /// Raw newline in a string value is kept as content.
    NewlineInString,
    /// String value whose closing quote was omitted before a separator.
    UnclosedString,
    /// `"` inside a string value that turned out not to close it.
    StrayQuote,
    /// Number or literal that went wrong is read as a string.
    MalformedScalar,
    /// Empty array slot: `null` is synthesized.
    EmptyElement,
    /// Trailing or stray comma is dropped.
    StrayComma,
    /// Text before the root container is skipped.
    LeadingText,
    /// Text after the root container is skipped.
    TrailingText,
}

#[cfg(test)]
mod tests {
    use super::{is_quote_like, is_value_terminator, is_whitespace};

    #[test]
    fn classes() {
        assert!(is_whitespace('\u{3000}'));
        assert!(is_whitespace('\u{FEFF}'));
        assert!(!is_whitespace('x'));
        assert!(is_quote_like('”'));
        assert!(is_quote_like('\''));
        assert!(!is_quote_like('"'));
        assert!(is_value_terminator(']'));
        assert!(!is_value_terminator(':'));
    }
}
