/// Recognizer for the JSON number grammar.
///
/// `-? (0 | [1-9][0-9]*) (\. [0-9]+)? ([eE] [+-]? [0-9]+)?`
///
/// The decoder keeps the characters; this type only tracks where in the
/// grammar the token stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum NumberLexer {
    #[default]
    Start,
    Sign,
    Zero,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentInteger,
}

impl NumberLexer {
    /// Whether `c` can start a number.
    pub fn starts(c: char) -> bool {
        c == '-' || c.is_ascii_digit()
    }

    /// Advances over `c` if the grammar allows it there.
    pub fn advance(&mut self, c: char) -> bool {
        use NumberLexer::{
            Exponent, ExponentInteger, ExponentSign, Fraction, Integer, Point, Sign, Start, Zero,
        };
        let next = match (*self, c) {
            (Start, '-') => Sign,
            (Start | Sign, '0') => Zero,
            (Start | Sign, '1'..='9') | (Integer, '0'..='9') => Integer,
            (Zero | Integer, '.') => Point,
            (Point | Fraction, '0'..='9') => Fraction,
            (Zero | Integer | Fraction, 'e' | 'E') => Exponent,
            (Exponent, '+' | '-') => ExponentSign,
            (Exponent | ExponentSign | ExponentInteger, '0'..='9') => ExponentInteger,
            _ => return false,
        };
        *self = next;
        true
    }

    /// Whether the characters so far form a whole number.
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            NumberLexer::Zero | NumberLexer::Integer | NumberLexer::Fraction | NumberLexer::ExponentInteger
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::NumberLexer;

    fn lex(text: &str) -> Option<NumberLexer> {
        let mut n = NumberLexer::default();
        text.chars().all(|c| n.advance(c)).then_some(n)
    }

    #[rstest]
    #[case("0")]
    #[case("-0")]
    #[case("10")]
    #[case("-20240908")]
    #[case("3.25")]
    #[case("1e10")]
    #[case("1E+2")]
    #[case("-0.5e-3")]
    fn complete_numbers(#[case] text: &str) {
        assert!(lex(text).is_some_and(NumberLexer::is_complete), "{text}");
    }

    #[rstest]
    #[case("-")]
    #[case("1.")]
    #[case("1e")]
    #[case("1e+")]
    fn incomplete_numbers(#[case] text: &str) {
        assert!(lex(text).is_some_and(|n| !n.is_complete()), "{text}");
    }

    #[rstest]
    #[case("01")]
    #[case("+1")]
    #[case(".5")]
    #[case("1.2.3")]
    #[case("10a")]
    #[case("--1")]
    fn rejected_numbers(#[case] text: &str) {
        assert_eq!(lex(text), None, "{text}");
    }
}
