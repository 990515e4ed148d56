//! Streaming tag decoder.
//!
//! [`TagParser`] reads HTML or XML-like markup a character at a time and
//! reports elements, text, CDATA sections, doctypes and processing
//! instructions as soon as they are known, each addressed by its position in
//! the document. It validates nothing and never fails: prose before the first
//! tag is skipped, unmatched close tags are ignored and unclosed elements are
//! closed when an ancestor closes.
//!
//! ```
//! use streamtrace::{TagEvent, TagParser, TagParserOptions};
//!
//! let mut parser = TagParser::new(TagParserOptions::default());
//! let mut events = Vec::new();
//! parser.trace("<ul><li>one</li><li>tw", &mut events);
//! parser.trace("o</li></ul>", &mut events);
//! parser.end(&mut events);
//!
//! let opened: Vec<&str> = events
//!     .iter()
//!     .filter_map(|e| match e {
//!         TagEvent::OpenTag { path, .. } => Some(path.as_str()),
//!         _ => None,
//!     })
//!     .collect();
//! assert_eq!(opened, ["/ul[1]", "/ul[1]/li[1]", "/ul[1]/li[2]"]);
//! ```

mod attributes;
mod event;
mod node_path;
mod options;

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

pub use event::{Attributes, TagEvent};
pub use options::TagParserOptions;

use self::node_path::NodePath;
use crate::{sink::EventSink, utf8_buffer::Utf8Buffer};

/// Elements that never have content and close as soon as they open.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is delivered verbatim.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    /// Before the first `<`.
    Init,
    Text,
    /// Inside `<...>`.
    TagName,
    Instruction,
    Comment,
    CData,
    Doctype,
    End,
}

/// Incremental markup decoder with addressed events.
///
/// Feed text with [`trace`](Self::trace) (or bytes with
/// [`trace_bytes`](Self::trace_bytes)) and call [`end`](Self::end) once the
/// markup is known to be complete.
#[derive(Debug, Clone)]
pub struct TagParser {
    options: TagParserOptions,
    /// `Init` at the bottom and at most one state above it.
    states: Vec<TagState>,
    /// Raw characters of the construct being read.
    recording: String,
    /// The tag being read started with `</`.
    closing: bool,
    /// Open quote inside the tag being read.
    quote: Option<char>,
    prev: Option<char>,
    path: NodePath,
    bytes: Utf8Buffer,
    events: Vec<TagEvent>,
}

impl Default for TagParser {
    fn default() -> Self {
        Self::new(TagParserOptions::default())
    }
}

impl TagParser {
    #[must_use]
    pub fn new(options: TagParserOptions) -> Self {
        let path = NodePath::new(options.parent_path.as_deref());
        Self {
            options,
            states: alloc::vec![TagState::Init],
            recording: String::new(),
            closing: false,
            quote: None,
            prev: None,
            path,
            bytes: Utf8Buffer::default(),
            events: Vec::new(),
        }
    }

    /// Consumes the next fragment of markup, handing events to `sink` before
    /// returning. Input after [`TagEvent::End`] is ignored.
    pub fn trace<S: EventSink<TagEvent> + ?Sized>(&mut self, text: &str, sink: &mut S) {
        for c in text.chars() {
            if self.is_ended() {
                break;
            }
            self.step(c);
            self.prev = Some(c);
            for event in self.events.drain(..) {
                sink.emit(event);
            }
        }
    }

    /// Like [`trace`](Self::trace), for UTF-8 bytes split anywhere.
    pub fn trace_bytes<S: EventSink<TagEvent> + ?Sized>(&mut self, bytes: &[u8], sink: &mut S) {
        let text = self.bytes.decode(bytes);
        self.trace(&text, sink);
    }

    /// Emits [`TagEvent::End`] unless it was already emitted. Text that no
    /// tag has terminated yet is dropped.
    pub fn end<S: EventSink<TagEvent> + ?Sized>(&mut self, sink: &mut S) {
        self.finish();
        for event in self.events.drain(..) {
            sink.emit(event);
        }
    }

    /// Returns the decoder to its initial state, keeping the options.
    pub fn reset(&mut self) {
        *self = Self::new(core::mem::take(&mut self.options));
    }

    #[must_use]
    pub fn options(&self) -> &TagParserOptions {
        &self.options
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state() == TagState::End
    }

    fn state(&self) -> TagState {
        self.states.last().copied().unwrap_or(TagState::Init)
    }

    /// Replaces the current state; `Init` stays at the bottom.
    fn enter(&mut self, state: TagState) {
        let from = self.state();
        if from != TagState::Init {
            self.states.pop();
        }
        tracing::trace!(?from, to = ?state, "tag state");
        self.states.push(state);
    }

    fn finish(&mut self) {
        if self.is_ended() {
            return;
        }
        self.recording.clear();
        self.events.push(TagEvent::End);
        self.enter(TagState::End);
    }

    fn step(&mut self, c: char) {
        match self.state() {
            TagState::Init => {
                if c == '<' {
                    self.start_tag();
                }
            }
            TagState::Text => self.trace_text(c),
            TagState::TagName => self.trace_tag(c),
            TagState::Instruction => {
                self.recording.push(c);
                if self.recording.ends_with("?>") {
                    self.complete_instruction();
                }
            }
            TagState::Comment => {
                self.recording.push(c);
                if self.recording.ends_with("-->") {
                    self.recording.clear();
                    self.enter(TagState::Text);
                }
            }
            TagState::CData => {
                self.recording.push(c);
                if self.recording.ends_with("]]>") {
                    self.complete_cdata();
                }
            }
            TagState::Doctype => {
                if c == '>' {
                    self.complete_doctype();
                } else {
                    self.recording.push(c);
                }
            }
            TagState::End => {}
        }
    }

    // ---------- Text ----------

    fn trace_text(&mut self, c: char) {
        if let Some(name) = self.path.current_element().filter(|n| is_raw_text(n)) {
            let name: String = name.into();
            self.trace_raw_text(c, &name);
            return;
        }
        if c == '<' {
            self.flush_text();
            self.start_tag();
            return;
        }
        self.recording.push(c);
        if c.is_whitespace() {
            return;
        }
        let beginning = !self.path.in_text();
        if beginning {
            self.path.push_text();
        }
        let delta = if !beginning && self.prev.is_some_and(char::is_whitespace) {
            alloc::format!(" {c}")
        } else {
            c.to_string()
        };
        self.events.push(TagEvent::TextDelta {
            path: self.path.address().into(),
            delta,
        });
    }

    /// Content of `script` and `style` runs up to the matching close tag.
    fn trace_raw_text(&mut self, c: char, name: &str) {
        self.recording.push(c);
        if c != '>' {
            return;
        }
        let body = self.recording[..self.recording.len() - 1].trim_end();
        let Some(start) = body.rfind("</") else {
            return;
        };
        if !body[start + 2..].eq_ignore_ascii_case(name) {
            return;
        }
        self.recording.truncate(start);
        self.flush_text();
        let closed = self.close_element(name);
        self.after_tag(closed);
    }

    /// Emits the text run read so far, if it holds more than whitespace.
    fn flush_text(&mut self) {
        let raw = core::mem::take(&mut self.recording);
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        if !self.path.in_text() {
            self.path.push_text();
        }
        self.events.push(TagEvent::Text {
            path: self.path.address().into(),
            text: text.into(),
        });
        self.path.pop();
    }

    // ---------- Tags ----------

    fn start_tag(&mut self) {
        self.recording.clear();
        self.closing = false;
        self.quote = None;
        self.enter(TagState::TagName);
    }

    fn trace_tag(&mut self, c: char) {
        if let Some(quote) = self.quote {
            if c == quote {
                self.quote = None;
            }
            self.recording.push(c);
            return;
        }
        match c {
            '>' => {
                self.complete_tag();
                return;
            }
            '"' | '\'' if self.recording.trim_end().ends_with('=') => self.quote = Some(c),
            _ => {}
        }
        self.recording.push(c);
        match self.recording.as_str() {
            "?" => {
                self.recording.clear();
                self.enter(TagState::Instruction);
            }
            "/" if !self.closing => {
                self.recording.clear();
                self.closing = true;
            }
            "![" => {
                self.recording.clear();
                self.enter(TagState::CData);
            }
            "!-" => {
                self.recording.clear();
                self.enter(TagState::Comment);
            }
            "!D" | "!d" => {
                self.recording.remove(0);
                self.enter(TagState::Doctype);
            }
            _ => {}
        }
    }

    fn complete_tag(&mut self) {
        let raw = core::mem::take(&mut self.recording);
        let mut body = raw.trim();
        let self_closing = body.ends_with('/');
        if self_closing {
            body = body[..body.len() - 1].trim_end();
        }
        let (name, attributes) = attributes::parse(body);
        let mut closed = false;
        if name.is_empty() || name.starts_with('!') {
            tracing::trace!(tag = body, "ignored tag");
        } else if self.closing {
            closed = self.close_element(&name);
        } else {
            self.path.push_element(&name);
            self.events.push(TagEvent::OpenTag {
                path: self.path.address().into(),
                name: name.clone(),
                attributes,
            });
            if self_closing || is_void(&name) {
                self.close_top(name);
                closed = true;
            }
        }
        self.closing = false;
        self.after_tag(closed);
    }

    fn after_tag(&mut self, closed: bool) {
        self.enter(TagState::Text);
        if closed && self.options.end_on_root_close && self.path.depth() == 0 {
            self.finish();
        }
    }

    fn close_top(&mut self, name: String) {
        self.events.push(TagEvent::CloseTag {
            path: self.path.address().into(),
            name,
        });
        self.path.pop();
    }

    /// Closes the innermost open element named `name` and everything above
    /// it. Returns `false` when no such element is open.
    fn close_element(&mut self, name: &str) -> bool {
        let Some(distance) = self.path.distance_to(name) else {
            tracing::trace!(name, "unmatched close tag");
            return false;
        };
        for _ in 0..=distance {
            let top: String = self.path.top_name().into();
            if self.path.in_text() {
                self.path.pop();
            } else {
                self.close_top(top);
            }
        }
        true
    }

    // ---------- Declarations ----------

    fn complete_instruction(&mut self) {
        let raw = core::mem::take(&mut self.recording);
        let (name, attributes) = attributes::parse(&raw[..raw.len() - 2]);
        self.events.push(TagEvent::Instruction { name, attributes });
        self.enter(TagState::Text);
    }

    fn complete_cdata(&mut self) {
        let raw = core::mem::take(&mut self.recording);
        let body = &raw[..raw.len() - 3];
        let content = body
            .strip_prefix("CDATA[")
            .or_else(|| body.split_once('[').map(|(_, rest)| rest))
            .unwrap_or(body);
        self.events.push(TagEvent::CData {
            path: self.path.address().into(),
            content: content.into(),
        });
        self.enter(TagState::Text);
    }

    fn complete_doctype(&mut self) {
        let raw = core::mem::take(&mut self.recording);
        if raw.to_ascii_uppercase().starts_with("DOCTYPE") {
            let name = raw.get("DOCTYPE".len()..).unwrap_or_default().trim();
            self.events.push(TagEvent::Doctype { name: name.into() });
        }
        self.enter(TagState::Text);
    }
}
