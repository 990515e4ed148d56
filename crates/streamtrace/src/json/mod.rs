//! Streaming JSON decoder.
//!
//! [`JsonParser`] accepts a document in fragments of any size and reports
//! every leaf the moment its characters arrive, addressed by a URI built from
//! the keys and indices leading to it. Characters are processed one at a time
//! against a stack of [`LexState`]s, so how the input is split never changes
//! what is emitted.
//!
//! With [`JsonParserOptions::auto_fix`] the decoder also repairs the
//! malformations language models tend to produce (missing quotes, missing
//! values, raw newlines, prose around the document) instead of failing.
//!
//! ```
//! use streamtrace::{JsonEvent, JsonParser, JsonParserOptions};
//!
//! let mut parser = JsonParser::new(JsonParserOptions {
//!     auto_fix: true,
//!     ..Default::default()
//! });
//! let mut events = Vec::new();
//! parser.trace("Sure! {\"name\": bear", &mut events).unwrap();
//! parser.trace("bobo\", \"age\": }", &mut events).unwrap();
//! parser.end().unwrap();
//!
//! let value = parser.value().unwrap();
//! assert_eq!(value.to_string(), r#"{"age":null,"name":"bearbobo"}"#);
//! ```

mod escape_buffer;
mod event;
mod key_path;
mod literal_buffer;
mod number;
mod options;
mod repair;
mod state;

use alloc::{string::String, vec::Vec};

pub use event::{DataError, JsonEvent};
pub use options::JsonParserOptions;

use self::{
    escape_buffer::{Decoded, EscapeDecoder},
    key_path::KeyPath,
    literal_buffer::{ExpectedLiteralBuffer, Step},
    number::NumberLexer,
    repair::{Repair, is_quote_like, is_value_terminator, is_whitespace},
    state::{LexState, StateStack},
};
use crate::{
    error::ParserError, sink::EventSink, utf8_buffer::Utf8Buffer, value::Value,
    value_builder::ValueBuilder,
};

type Result<T = ()> = core::result::Result<T, ParserError>;

/// Per-string lexing state, reset whenever a string starts.
#[derive(Debug, Clone, Default)]
struct StringLexer {
    /// The quote that opened the string; `None` for bare values and
    /// unquoted keys.
    opener: Option<char>,
    escape: EscapeDecoder,
    /// A character that may end the string, and the whitespace read after it.
    closing: Option<String>,
    /// Whitespace inside a bare string not yet known to be content.
    pending_ws: String,
    /// Key text exactly as written, escapes included.
    raw: String,
}

/// A closed key waiting for its `:`.
#[derive(Debug, Clone, Default)]
struct PendingKey {
    /// Decoded text, used in the document.
    text: String,
    /// Text as written between the quotes, used in the URI.
    raw: String,
}

/// Incremental JSON decoder with path-addressed events.
///
/// Feed text with [`trace`](Self::trace) (or raw bytes with
/// [`trace_bytes`](Self::trace_bytes)) and call [`end`](Self::end) once the
/// input is exhausted. The first [`ParserError`] poisons the decoder.
#[derive(Debug, Clone)]
pub struct JsonParser {
    options: JsonParserOptions,
    states: StateStack,
    key_path: KeyPath,
    /// Decoded text of the scalar being read.
    token: String,
    pending_key: Option<PendingKey>,
    string: StringLexer,
    number: NumberLexer,
    literal: ExpectedLiteralBuffer,
    builder: ValueBuilder,
    bytes: Utf8Buffer,
    events: Vec<JsonEvent>,
    /// The innermost container's last separator was a comma.
    after_comma: bool,
    root: Option<Value>,
    failure: Option<ParserError>,
    line: usize,
    column: usize,
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new(JsonParserOptions::default())
    }
}

impl JsonParser {
    #[must_use]
    pub fn new(options: JsonParserOptions) -> Self {
        let key_path = KeyPath::new(options.parent_path.as_deref().filter(|p| !p.is_empty()));
        Self {
            options,
            states: StateStack::new(),
            key_path,
            token: String::new(),
            pending_key: None,
            string: StringLexer::default(),
            number: NumberLexer::default(),
            literal: ExpectedLiteralBuffer::default(),
            builder: ValueBuilder::default(),
            bytes: Utf8Buffer::default(),
            events: Vec::new(),
            after_comma: false,
            root: None,
            failure: None,
            line: 1,
            column: 1,
        }
    }

    /// Consumes the next fragment of the document.
    ///
    /// Events are handed to `sink` in order before this returns, including
    /// those produced by characters preceding a failure.
    ///
    /// # Errors
    ///
    /// [`ParserError`] when a character violates the grammar and no repair
    /// applies, or when the decoder already failed earlier.
    pub fn trace<S: EventSink<JsonEvent> + ?Sized>(&mut self, text: &str, sink: &mut S) -> Result {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.options.debug {
            tracing::debug!(len = text.len(), line = self.line, column = self.column, "trace");
        }
        for c in text.chars() {
            let stepped = self.step(c);
            for event in self.events.drain(..) {
                sink.emit(event);
            }
            if let Err(err) = stepped {
                return Err(self.fail(err));
            }
            self.advance_position(c);
        }
        Ok(())
    }

    /// Like [`trace`](Self::trace), for UTF-8 bytes split anywhere, even
    /// inside a code point.
    ///
    /// # Errors
    ///
    /// See [`trace`](Self::trace).
    pub fn trace_bytes<S: EventSink<JsonEvent> + ?Sized>(&mut self, bytes: &[u8], sink: &mut S) -> Result {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let text = self.bytes.decode(bytes);
        self.trace(&text, sink)
    }

    /// Declares the input complete.
    ///
    /// # Errors
    ///
    /// [`ParserError`] with [`Unexpected::EndOfInput`](crate::Unexpected::EndOfInput)
    /// unless the root container has closed. Empty input fails here.
    pub fn end(&mut self) -> Result {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        // A truncated code point after the root only matters in strict mode.
        if self.is_finished() && (self.options.auto_fix || self.bytes.pending() == 0) {
            return Ok(());
        }
        let err = ParserError::end_of_input(self.line, self.column);
        Err(self.fail(err))
    }

    /// Returns the decoder to its initial state, keeping the options.
    pub fn reset(&mut self) {
        *self = Self::new(core::mem::take(&mut self.options));
    }

    #[must_use]
    pub fn options(&self) -> &JsonParserOptions {
        &self.options
    }

    /// Whether the root container has closed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.states.top() == LexState::Finish
    }

    /// The materialized document, once finished.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    /// Everything resolved so far: closed containers, completed scalars and
    /// the open containers holding them. The string being read is left out.
    #[must_use]
    pub fn partial_value(&self) -> Option<Value> {
        self.root.clone().or_else(|| self.builder.partial())
    }

    fn fail(&mut self, err: ParserError) -> ParserError {
        if self.options.debug {
            tracing::debug!(%err, "decoder failed");
        }
        self.failure = Some(err.clone());
        err
    }

    fn advance_position(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn invalid(&self, c: char) -> ParserError {
        ParserError::invalid_char(c, self.line, self.column)
    }

    fn repaired(&self, repair: Repair) {
        if self.options.debug {
            tracing::debug!(?repair, line = self.line, column = self.column, "repair");
        }
    }

    // ---------- State stack ----------

    fn push_state(&mut self, state: LexState) {
        if state == LexState::Array {
            self.key_path.open_array();
        }
        self.states.push(state);
        if self.options.debug {
            tracing::debug!(?state, depth = self.states.depth(), "push");
        }
    }

    /// Pops the top context. Leaving a value drops its URI segment and
    /// leaving an array drops its element counter.
    fn pop_state(&mut self) -> Option<LexState> {
        self.token.clear();
        let state = self.states.pop();
        match state {
            Some(LexState::Value) => self.key_path.pop(),
            Some(LexState::Array) => self.key_path.close_array(),
            _ => {}
        }
        if self.options.debug {
            tracing::debug!(?state, depth = self.states.depth(), "pop");
        }
        state
    }

    fn step(&mut self, c: char) -> Result {
        match self.states.top() {
            LexState::Begin => self.trace_begin(c),
            LexState::Object => self.trace_object(c),
            LexState::Array => self.trace_array(c),
            LexState::Key => self.trace_key(c),
            LexState::Value => self.trace_value(c),
            LexState::String => self.trace_string(c),
            LexState::Number => self.trace_number(c),
            LexState::Boolean | LexState::Null => self.trace_literal(c),
            LexState::Breaker => self.trace_breaker(c),
            LexState::Finish => self.trace_finish(c),
        }
    }

    // ---------- Containers ----------

    fn trace_begin(&mut self, c: char) -> Result {
        match c {
            '{' => self.open_object(),
            '[' => self.open_array(),
            c if is_whitespace(c) => {}
            _ if self.options.auto_fix => self.repaired(Repair::LeadingText),
            _ => return Err(self.invalid(c)),
        }
        Ok(())
    }

    fn open_object(&mut self) {
        self.after_comma = false;
        self.push_state(LexState::Object);
        self.builder.begin_object();
    }

    fn open_array(&mut self) {
        self.after_comma = false;
        self.push_state(LexState::Array);
        self.builder.begin_array();
    }

    fn trace_object(&mut self, c: char) -> Result {
        let auto_fix = self.options.auto_fix;
        match c {
            c if is_whitespace(c) => Ok(()),
            '"' => {
                self.begin_key(Some('"'));
                Ok(())
            }
            '}' if !self.after_comma || auto_fix => {
                if self.after_comma {
                    self.repaired(Repair::StrayComma);
                }
                self.close_container();
                Ok(())
            }
            ',' if auto_fix => {
                self.repaired(Repair::StrayComma);
                Ok(())
            }
            ':' if auto_fix => {
                self.repaired(Repair::MissingKey);
                self.after_comma = false;
                self.push_state(LexState::Key);
                self.pending_key = Some(PendingKey::default());
                self.step(c)
            }
            c if auto_fix && is_quote_like(c) => {
                self.begin_key(Some(c));
                Ok(())
            }
            c if auto_fix && !matches!(c, '}' | ']' | '{' | '[') => {
                self.repaired(Repair::UnquotedKey);
                self.begin_key(None);
                self.step(c)
            }
            _ => Err(self.invalid(c)),
        }
    }

    fn trace_array(&mut self, c: char) -> Result {
        let auto_fix = self.options.auto_fix;
        match c {
            c if is_whitespace(c) => Ok(()),
            ']' if !self.after_comma || auto_fix => {
                if self.after_comma {
                    self.repaired(Repair::StrayComma);
                }
                self.close_container();
                Ok(())
            }
            ',' if auto_fix => {
                self.repaired(Repair::EmptyElement);
                self.start_element();
                self.step(c)
            }
            ',' | ']' | '}' | ':' => Err(self.invalid(c)),
            _ => {
                self.start_element();
                self.step(c)
            }
        }
    }

    /// Closes the container on top of the stack. Closing the root emits
    /// `finish`.
    fn close_container(&mut self) {
        self.pop_state();
        let closed = self.builder.end_container();
        if self.states.top() == LexState::Value {
            self.complete_value();
            return;
        }
        self.states.finish();
        if self.options.debug {
            tracing::debug!("finish");
        }
        let value = closed.unwrap_or_default();
        self.root = Some(value.clone());
        self.events.push(JsonEvent::Finish { value });
    }

    fn trace_breaker(&mut self, c: char) -> Result {
        match c {
            c if is_whitespace(c) => Ok(()),
            ',' => {
                self.pop_state();
                self.after_comma = true;
                Ok(())
            }
            '}' | ']' => {
                self.pop_state();
                self.step(c)
            }
            _ => Err(self.invalid(c)),
        }
    }

    fn trace_finish(&mut self, c: char) -> Result {
        if is_whitespace(c) {
            Ok(())
        } else if self.options.auto_fix {
            self.repaired(Repair::TrailingText);
            Ok(())
        } else {
            Err(self.invalid(c))
        }
    }

    // ---------- Keys ----------

    fn begin_key(&mut self, opener: Option<char>) {
        self.after_comma = false;
        self.push_state(LexState::Key);
        self.begin_string(opener);
    }

    fn trace_key(&mut self, c: char) -> Result {
        let auto_fix = self.options.auto_fix;
        match c {
            ':' => {
                let key = self.pending_key.take().unwrap_or_default();
                self.pop_state();
                self.enter_value(Some(key));
                Ok(())
            }
            c if is_whitespace(c) => Ok(()),
            ',' | '}' if auto_fix => {
                self.repaired(Repair::KeyWithoutValue);
                let key = self.pending_key.take().unwrap_or_default();
                self.pop_state();
                self.enter_value(Some(key));
                self.step(c)
            }
            c if auto_fix && self.pending_key.as_ref().is_some_and(|k| k.raw.is_empty()) => {
                // `""name"`: the empty key was really a doubled opening quote.
                self.repaired(Repair::DoubledKeyQuote);
                self.pending_key = None;
                if c == '"' || is_quote_like(c) {
                    self.begin_string(Some(c));
                    Ok(())
                } else {
                    self.begin_string(Some('"'));
                    self.step(c)
                }
            }
            _ if auto_fix => {
                self.repaired(Repair::KeyTrailingGarbage);
                Ok(())
            }
            _ => Err(self.invalid(c)),
        }
    }

    fn trace_key_string(&mut self, c: char) -> Result {
        if self.string.closing.is_some() {
            return self.trace_key_lookahead(c);
        }
        let auto_fix = self.options.auto_fix;
        if let Some(decoded) = self.unescape(c)? {
            self.string.raw.push(c);
            self.push_decoded(decoded, false);
            return Ok(());
        }
        if let Some(replacement) = self.string.escape.flush() {
            self.token.push(replacement);
        }
        let unquoted = self.string.opener.is_none();
        match c {
            '"' => self.close_key(),
            c if auto_fix && unquoted && is_quote_like(c) => self.close_key(),
            ':' if auto_fix && unquoted => return self.unclosed_key(),
            // Inside a quoted key these end it only when the next character
            // says so.
            c if auto_fix && (c == ':' || is_quote_like(c)) => {
                self.string.closing = Some(String::from(c));
            }
            '\n' | '\r' if auto_fix => self.repaired(Repair::NewlineInKey),
            c if c < ' ' && !auto_fix => return Err(self.invalid(c)),
            c => {
                self.token.push(c);
                self.string.raw.push(c);
            }
        }
        Ok(())
    }

    /// Decides a `:` or quote-like character held back inside a quoted key.
    /// A `:` followed by whitespace ends a key whose closing quote is
    /// missing; a quote followed by `:` closes the key. Anything else makes
    /// the held characters key text.
    fn trace_key_lookahead(&mut self, c: char) -> Result {
        let Some(mut held) = self.string.closing.take() else {
            return Ok(());
        };
        let colon = held.starts_with(':');
        if is_whitespace(c) {
            if colon {
                self.unclosed_key()?;
                return self.step(c);
            }
            held.push(c);
            self.string.closing = Some(held);
            return Ok(());
        }
        let quote_opened = self.string.opener.is_some_and(is_quote_like);
        if !colon && (c == ':' || (quote_opened && is_value_terminator(c))) {
            self.close_key();
            return self.step(c);
        }
        for h in held.chars().filter(|h| !matches!(h, '\n' | '\r')) {
            self.token.push(h);
            self.string.raw.push(h);
        }
        self.trace_key_string(c)
    }

    /// A `:` inside a key that never closed: the key ends before it, without
    /// trailing whitespace or stray quotes.
    fn unclosed_key(&mut self) -> Result {
        self.repaired(Repair::UnclosedKey);
        let trimmed = |s: &str| s.trim_end_matches(|c| is_whitespace(c) || is_quote_like(c)).len();
        let len = trimmed(&self.token);
        self.token.truncate(len);
        let len = trimmed(&self.string.raw);
        self.string.raw.truncate(len);
        self.close_key();
        self.step(':')
    }

    fn close_key(&mut self) {
        let text = core::mem::take(&mut self.token);
        let raw = core::mem::take(&mut self.string.raw);
        self.pop_state();
        self.pending_key = Some(PendingKey { text, raw });
    }

    // ---------- Values ----------

    fn enter_value(&mut self, key: Option<PendingKey>) {
        match key {
            Some(PendingKey { text, raw }) => {
                self.key_path.push_key(&raw);
                self.builder.key(text);
            }
            None => {
                self.key_path.push_index();
            }
        }
        self.push_state(LexState::Value);
    }

    fn start_element(&mut self) {
        self.after_comma = false;
        self.enter_value(None);
    }

    fn trace_value(&mut self, c: char) -> Result {
        match c {
            c if is_whitespace(c) => Ok(()),
            '"' => {
                self.begin_string(Some('"'));
                Ok(())
            }
            '{' => {
                self.open_object();
                Ok(())
            }
            '[' => {
                self.open_array();
                Ok(())
            }
            c if NumberLexer::starts(c) => {
                self.number = NumberLexer::default();
                self.number.advance(c);
                self.push_state(LexState::Number);
                self.token.push(c);
                Ok(())
            }
            't' | 'f' | 'n' => {
                self.literal = ExpectedLiteralBuffer::new(c);
                self.push_state(if c == 'n' { LexState::Null } else { LexState::Boolean });
                self.token.push(c);
                Ok(())
            }
            c if self.options.auto_fix && is_value_terminator(c) => {
                self.repaired(Repair::MissingValue);
                self.resolve_scalar(Value::Null);
                self.step(c)
            }
            c if self.options.auto_fix => {
                self.repaired(Repair::BareString);
                self.begin_string(None);
                self.step(c)
            }
            _ => Err(self.invalid(c)),
        }
    }

    fn emit_data(&mut self, delta: Value) {
        self.events.push(JsonEvent::Data {
            uri: self.key_path.uri().into(),
            delta,
            error: None,
        });
    }

    /// Emits a complete non-string scalar. Expects `Value` on top.
    fn resolve_scalar(&mut self, value: Value) {
        self.emit_data(value.clone());
        self.builder.scalar(value);
        self.complete_value();
    }

    fn complete_value(&mut self) {
        self.pop_state();
        self.push_state(LexState::Breaker);
    }

    fn trace_number(&mut self, c: char) -> Result {
        if self.number.advance(c) {
            self.token.push(c);
            return Ok(());
        }
        if (is_whitespace(c) || is_value_terminator(c)) && self.number.is_complete() {
            let n: f64 = self.token.parse().map_err(|_| self.invalid(c))?;
            self.pop_state();
            self.resolve_scalar(Value::Number(n));
            return self.step(c);
        }
        self.relex_as_string(c)
    }

    /// A spelled-out literal still needs the character after it: only
    /// whitespace or a separator confirms it (`trueish` is a string).
    fn trace_literal(&mut self, c: char) -> Result {
        if let Some(value) = self.literal.completed() {
            if is_whitespace(c) || is_value_terminator(c) {
                self.pop_state();
                self.resolve_scalar(value);
                return self.step(c);
            }
            return self.relex_as_string(c);
        }
        match self.literal.step(c) {
            Step::NeedMore | Step::Done => {
                self.token.push(c);
                Ok(())
            }
            Step::Reject => self.relex_as_string(c),
        }
    }

    /// A number or literal went wrong at `c`: read everything so far as the
    /// start of a bare string.
    fn relex_as_string(&mut self, c: char) -> Result {
        if !self.options.auto_fix {
            return Err(self.invalid(c));
        }
        self.repaired(Repair::MalformedScalar);
        let consumed = core::mem::take(&mut self.token);
        self.pop_state();
        self.begin_string(None);
        for ch in consumed.chars() {
            self.step(ch)?;
        }
        self.step(c)
    }

    // ---------- Strings ----------

    fn begin_string(&mut self, opener: Option<char>) {
        self.string = StringLexer {
            opener,
            ..StringLexer::default()
        };
        self.push_state(LexState::String);
    }

    fn trace_string(&mut self, c: char) -> Result {
        if self.states.parent() == Some(LexState::Key) {
            self.trace_key_string(c)
        } else if self.string.opener.is_some() {
            self.trace_quoted_value(c)
        } else {
            self.trace_bare_value(c)
        }
    }

    /// Routes `c` through the escape decoder when it belongs to an escape.
    fn unescape(&mut self, c: char) -> Result<Option<Decoded>> {
        if self.string.escape.is_active() {
            return self.string.escape.feed(c).map(Some).map_err(|_| self.invalid(c));
        }
        if c == '\\' {
            self.string.escape.begin();
            return Ok(Some(Decoded::Pending));
        }
        Ok(None)
    }

    fn push_decoded(&mut self, decoded: Decoded, emit: bool) {
        match decoded {
            Decoded::Pending => {}
            Decoded::One(a) => self.push_char(a, emit),
            Decoded::Two(a, b) => {
                self.push_char(a, emit);
                self.push_char(b, emit);
            }
        }
    }

    fn push_char(&mut self, c: char, emit: bool) {
        self.token.push(c);
        if emit {
            self.emit_data(Value::from(c));
        }
    }

    fn trace_quoted_value(&mut self, c: char) -> Result {
        if self.string.closing.is_some() {
            return self.trace_closing_quote(c);
        }
        if let Some(decoded) = self.unescape(c)? {
            self.push_decoded(decoded, true);
            return Ok(());
        }
        if let Some(replacement) = self.string.escape.flush() {
            self.push_char(replacement, true);
        }
        match c {
            '"' if self.options.auto_fix => {
                self.string.closing = Some(String::new());
                Ok(())
            }
            '"' => {
                self.resolve_string();
                Ok(())
            }
            '\n' if self.options.auto_fix => self.newline_in_string(),
            c if c < ' ' && !self.options.auto_fix => Err(self.invalid(c)),
            c => {
                self.push_char(c, true);
                Ok(())
            }
        }
    }

    /// A quote inside a repaired string value closes it only if a separator
    /// follows.
    fn trace_closing_quote(&mut self, c: char) -> Result {
        if is_whitespace(c) {
            if let Some(gap) = &mut self.string.closing {
                gap.push(c);
            }
            return Ok(());
        }
        let gap = self.string.closing.take().unwrap_or_default();
        if is_value_terminator(c) {
            self.resolve_string();
        } else {
            self.repaired(Repair::StrayQuote);
            self.push_char('"', true);
            for w in gap.chars() {
                self.push_char(w, true);
            }
        }
        self.step(c)
    }

    /// A raw newline in a quoted value. If the text so far ends in a
    /// separator, the closing quote was omitted before it: retract what was
    /// streamed, resolve the text before the separator and re-read the rest.
    fn newline_in_string(&mut self) -> Result {
        if !self.token.trim_end().ends_with(is_value_terminator) {
            self.repaired(Repair::NewlineInString);
            self.push_char('\n', true);
            return Ok(());
        }
        self.repaired(Repair::UnclosedString);
        let raw = core::mem::take(&mut self.token);
        let cut = raw.trim_end().len() - 1;
        let (text, tail) = raw.split_at(cut);
        let uri: String = self.key_path.uri().into();
        self.events.push(JsonEvent::Data {
            uri: uri.clone(),
            delta: Value::String(String::new()),
            error: Some(DataError { token: raw.clone() }),
        });
        self.events.push(JsonEvent::Data {
            uri,
            delta: Value::from(text),
            error: None,
        });
        self.token.push_str(text);
        self.resolve_string();
        for ch in tail.chars() {
            self.step(ch)?;
        }
        self.step('\n')
    }

    fn trace_bare_value(&mut self, c: char) -> Result {
        match c {
            '"' => {
                self.resolve_string();
                Ok(())
            }
            c if is_value_terminator(c) => {
                self.resolve_string();
                self.step(c)
            }
            c if is_whitespace(c) => {
                self.string.pending_ws.push(c);
                Ok(())
            }
            c => {
                let gap = core::mem::take(&mut self.string.pending_ws);
                for w in gap.chars() {
                    self.push_char(w, true);
                }
                self.push_char(c, true);
                Ok(())
            }
        }
    }

    /// Emits `string-resolve` for the string on top of the stack and leaves
    /// its value context.
    fn resolve_string(&mut self) {
        let text = core::mem::take(&mut self.token);
        self.events.push(JsonEvent::StringResolve {
            uri: self.key_path.uri().into(),
            delta: text.clone(),
        });
        self.pop_state();
        self.builder.scalar(Value::String(text));
        self.complete_value();
    }
}
