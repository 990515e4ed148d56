//! Events emitted by [`JsonParser`](crate::JsonParser).
//!
//! Every leaf is addressed by a URI: the slash-joined chain of object keys and
//! array indices from the root, optionally prefixed with the configured parent
//! path. String leaves stream one decoded character per [`JsonEvent::Data`];
//! numbers, booleans and null arrive in a single `Data` event once complete.
//!
//! ```
//! use streamtrace::{JsonEvent, JsonParser, JsonParserOptions, Value};
//!
//! let mut parser = JsonParser::new(JsonParserOptions::default());
//! let mut events = Vec::new();
//! parser.trace(r#"{"tags":["ok"]}"#, &mut events).unwrap();
//! assert_eq!(
//!     events[0],
//!     JsonEvent::Data {
//!         uri: "tags/0".into(),
//!         delta: Value::from("o"),
//!         error: None,
//!     }
//! );
//! assert!(matches!(events.last(), Some(JsonEvent::Finish { .. })));
//! ```
use alloc::string::String;

use crate::value::Value;

#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "kebab-case")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum JsonEvent {
    /// A fragment of the leaf at `uri`.
    ///
    /// For strings `delta` is one decoded character; for other scalars it is
    /// the whole value. When `error` is set, the text previously streamed at
    /// `uri` was wrong and should be discarded; the corrected text follows in
    /// the next `Data` event.
    Data {
        uri: String,
        delta: Value,
        #[cfg_attr(
            any(test, feature = "serde"),
            serde(skip_serializing_if = "Option::is_none")
        )]
        error: Option<DataError>,
    },
    /// The full decoded text of the string leaf at `uri`, once its closing
    /// quote is known.
    StringResolve { uri: String, delta: String },
    /// The materialized root, once the outermost container closes.
    Finish { value: Value },
}

/// Correction marker carried by a retracting [`JsonEvent::Data`].
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataError {
    /// Raw text that was streamed before the decoder noticed the mistake.
    pub token: String,
}

impl JsonEvent {
    /// The address this event refers to; `None` for `Finish`.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match self {
            JsonEvent::Data { uri, .. } | JsonEvent::StringResolve { uri, .. } => Some(uri),
            JsonEvent::Finish { .. } => None,
        }
    }
}
