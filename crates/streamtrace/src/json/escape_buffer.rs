//! Decoding of backslash escapes inside JSON strings.
//!
//! The [`EscapeDecoder`] is fed the characters after a backslash one at a
//! time. Simple escapes resolve on their first character; `\uXXXX` escapes
//! accumulate four hexadecimal digits into a UTF-16 code unit. A high
//! surrogate is held back until the next escape shows whether a low surrogate
//! completes the pair.
//!
//! # Errors
//!
//! - An escape character outside `" \ / b f n r t u` is rejected.
//! - A non-hexadecimal character inside `\uXXXX` is rejected.
//!
//! Unpaired surrogates are not errors: they decode to U+FFFD.

const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidEscape;

/// Output of one [`EscapeDecoder::feed`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    Pending,
    One(char),
    /// A dangling high surrogate (as U+FFFD) followed by the decoded char.
    Two(char, char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    Backslash,
    Hex {
        unit: u16,
        digits: u8,
    },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct EscapeDecoder {
    state: State,
    high: Option<u16>,
}

impl EscapeDecoder {
    /// Whether the characters being fed belong to an escape.
    pub fn is_active(&self) -> bool {
        self.state != State::Idle
    }

    /// Called on the backslash itself.
    pub fn begin(&mut self) {
        self.state = State::Backslash;
    }

    pub fn feed(&mut self, c: char) -> Result<Decoded, InvalidEscape> {
        match self.state {
            State::Idle => Ok(Decoded::One(c)),
            State::Backslash => {
                let simple = match c {
                    '"' | '\\' | '/' => c,
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        self.state = State::Hex { unit: 0, digits: 0 };
                        return Ok(Decoded::Pending);
                    }
                    _ => return Err(InvalidEscape),
                };
                self.state = State::Idle;
                Ok(match self.high.take() {
                    Some(_) => Decoded::Two(REPLACEMENT, simple),
                    None => Decoded::One(simple),
                })
            }
            State::Hex { unit, digits } => {
                let digit = c.to_digit(16).ok_or(InvalidEscape)?;
                #[allow(clippy::cast_possible_truncation)]
                let unit = (unit << 4) | digit as u16;
                if digits < 3 {
                    self.state = State::Hex {
                        unit,
                        digits: digits + 1,
                    };
                    return Ok(Decoded::Pending);
                }
                self.state = State::Idle;
                Ok(self.code_unit(unit))
            }
        }
    }

    fn code_unit(&mut self, unit: u16) -> Decoded {
        match (self.high.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let scalar = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                Decoded::One(char::from_u32(scalar).unwrap_or(REPLACEMENT))
            }
            (Some(_), 0xD800..=0xDBFF) => {
                self.high = Some(unit);
                Decoded::One(REPLACEMENT)
            }
            (Some(_), _) => Decoded::Two(REPLACEMENT, char::from_u32(unit.into()).unwrap_or(REPLACEMENT)),
            (None, 0xD800..=0xDBFF) => {
                self.high = Some(unit);
                Decoded::Pending
            }
            (None, _) => Decoded::One(char::from_u32(unit.into()).unwrap_or(REPLACEMENT)),
        }
    }

    /// Gives up on a held high surrogate when something other than an
    /// escape follows it.
    pub fn flush(&mut self) -> Option<char> {
        self.high.take().map(|_| REPLACEMENT)
    }
}
