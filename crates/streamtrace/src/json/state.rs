use alloc::vec::Vec;

/// Lexer contexts of the JSON decoder.
///
/// The decoder keeps these on a stack; the top decides how the next
/// character is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexState {
    /// Before the root container.
    Begin,
    /// Inside `{`, expecting a key or `}`.
    Object,
    /// Inside `[`, expecting an element or `]`.
    Array,
    /// A key has been read, expecting `:`.
    Key,
    /// Expecting a value.
    Value,
    String,
    Number,
    Boolean,
    Null,
    /// A value has been read, expecting `,` or the container's close.
    Breaker,
    /// The root container has closed.
    Finish,
}

/// Invariant: never empty; `Begin` (or `Finish` once the root closed) sits
/// at the bottom.
#[derive(Debug, Clone)]
pub(crate) struct StateStack {
    states: Vec<LexState>,
}

impl StateStack {
    pub fn new() -> Self {
        let mut states = Vec::with_capacity(16);
        states.push(LexState::Begin);
        Self { states }
    }

    pub fn top(&self) -> LexState {
        self.states.last().copied().unwrap_or(LexState::Finish)
    }

    /// The context below the top.
    pub fn parent(&self) -> Option<LexState> {
        self.states.iter().rev().nth(1).copied()
    }

    pub fn push(&mut self, state: LexState) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<LexState> {
        if self.states.len() > 1 {
            self.states.pop()
        } else {
            None
        }
    }

    /// Swaps the bottom `Begin` for `Finish`.
    pub fn finish(&mut self) {
        self.states.clear();
        self.states.push(LexState::Finish);
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{LexState, StateStack};

    #[test]
    fn bottom_frame_is_never_popped() {
        let mut s = StateStack::new();
        assert_eq!(s.pop(), None);
        s.push(LexState::Object);
        s.push(LexState::Key);
        assert_eq!(s.parent(), Some(LexState::Object));
        assert_eq!(s.pop(), Some(LexState::Key));
        assert_eq!(s.pop(), Some(LexState::Object));
        assert_eq!(s.top(), LexState::Begin);
        assert_eq!(s.depth(), 1);
        s.finish();
        assert_eq!(s.top(), LexState::Finish);
    }
}
