//! Incremental decoders for text that arrives a few characters at a time,
//! such as the output of a language model.
//!
//! [`JsonParser`] turns a JSON document into per-leaf events addressed by
//! key/index URIs and can repair the malformations models commonly produce.
//! [`TagParser`] does the same for HTML or XML-like markup, addressing every
//! node by a `name[index]` path. Both decoders produce the same events no
//! matter how the input is split.
//!
//! ```rust
//! use streamtrace::{JsonEvent, JsonParser, JsonParserOptions, Value};
//!
//! let mut parser = JsonParser::new(JsonParserOptions::default());
//! let mut events = Vec::new();
//! for chunk in [r#"{"city": "Par"#, r#"is", "pop": 2.1}"#] {
//!     parser.trace(chunk, &mut events).unwrap();
//! }
//! parser.end().unwrap();
//!
//! assert_eq!(
//!     events[5],
//!     JsonEvent::StringResolve { uri: "city".into(), delta: "Paris".into() }
//! );
//! assert_eq!(parser.value().and_then(|v| v.pointer("pop")), Some(&Value::Number(2.1)));
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod json;
mod sink;
mod tag;
mod utf8_buffer;
mod value;
mod value_builder;

#[cfg(test)]
mod tests;

pub use error::{ErrorKind, ParserError, Unexpected};
pub use json::{DataError, JsonEvent, JsonParser, JsonParserOptions};
pub use sink::{EventSink, FnSink};
pub use tag::{Attributes, TagEvent, TagParser, TagParserOptions};
pub use value::{Array, Map, Value};
