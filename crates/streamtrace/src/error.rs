use core::fmt;

use thiserror::Error;

/// The single fatal condition a decoder can report.
///
/// Raised when input deviates from the JSON grammar and no enabled repair
/// rule applies. The decoder that raised it is poisoned: every later call
/// returns the same error and emits no events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid token {found} at {line}:{column}")]
pub struct ParserError {
    pub(crate) found: Unexpected,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

/// What the decoder was looking at when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unexpected {
    /// An input character no state could accept.
    Char(char),
    /// Input was declared complete before the document was.
    EndOfInput,
}

/// Error category; there is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected character or premature end of input.
    InvalidToken,
}

impl ParserError {
    pub(crate) fn invalid_char(c: char, line: usize, column: usize) -> Self {
        Self {
            found: Unexpected::Char(c),
            line,
            column,
        }
    }

    pub(crate) fn end_of_input(line: usize, column: usize) -> Self {
        Self {
            found: Unexpected::EndOfInput,
            line,
            column,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidToken
    }

    #[must_use]
    pub fn found(&self) -> Unexpected {
        self.found
    }

    /// 1-based line of the offending character.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the offending character.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Unexpected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Unexpected::Char(c) => write!(f, "'{}'", c.escape_debug()),
            Unexpected::EndOfInput => f.write_str("end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ErrorKind, ParserError, Unexpected};

    #[test]
    fn display_names_the_character_and_position() {
        let err = ParserError::invalid_char('x', 3, 14);
        assert_eq!(err.to_string(), "invalid token 'x' at 3:14");
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
        assert_eq!(err.found(), Unexpected::Char('x'));
    }

    #[test]
    fn control_characters_are_escaped() {
        let err = ParserError::invalid_char('\n', 1, 9);
        assert_eq!(err.to_string(), "invalid token '\\n' at 1:9");
    }

    #[test]
    fn end_of_input() {
        let err = ParserError::end_of_input(2, 1);
        assert_eq!(err.to_string(), "invalid token end of input at 2:1");
    }
}
