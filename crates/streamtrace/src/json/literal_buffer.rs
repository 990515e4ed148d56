use crate::value::Value;

/// What happened after feeding one more character into the literal matcher?
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched *and* completed the literal; see
    /// [`ExpectedLiteralBuffer::completed`].
    Done,
    /// Character did **not** match; the matcher is unchanged.
    Reject,
}

/// Prefix matcher for `true`, `false` and `null`.
///
/// Holds the bytes still expected; `None` when no literal is in flight. A
/// spelled-out literal keeps an empty remainder until the decoder sees the
/// character after it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) struct ExpectedLiteralBuffer(Option<(&'static [u8], Option<bool>)>);

impl ExpectedLiteralBuffer {
    /// Starts matching after the first character (`n`, `t` or `f`).
    pub fn new(first: char) -> Self {
        match first {
            'n' => Self(Some((b"ull", None))),
            't' => Self(Some((b"rue", Some(true)))),
            'f' => Self(Some((b"alse", Some(false)))),
            _ => Self(None),
        }
    }

    pub fn step(&mut self, c: char) -> Step {
        let Some((bytes, kind)) = self.0 else {
            return Step::Reject;
        };
        match bytes.split_first() {
            Some((expected, rest)) if char::from(*expected) == c => {
                self.0 = Some((rest, kind));
                if rest.is_empty() {
                    Step::Done
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }

    /// The literal, once every letter has been read.
    pub fn completed(&self) -> Option<Value> {
        match self.0 {
            Some((rest, kind)) if rest.is_empty() => Some(kind.map_or(Value::Null, Value::Boolean)),
            _ => None,
        }
    }
}
