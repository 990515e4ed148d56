//! Events emitted by [`TagParser`](crate::TagParser).
//!
//! Nodes are addressed by a chain of `name[index]` segments where `index`
//! counts same-named siblings under the same parent, starting at 1. Runs of
//! text get a synthetic `$$TEXTNODE[index]` segment of their own.
use alloc::{collections::BTreeMap, string::String};

/// Attribute names mapped to their unquoted values.
pub type Attributes = BTreeMap<String, String>;

#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "snake_case")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    /// An element opened at `path`.
    OpenTag {
        path: String,
        name: String,
        attributes: Attributes,
    },
    /// The element at `path` closed, explicitly or implicitly.
    CloseTag { path: String, name: String },
    /// The trimmed text of a finished text run.
    Text { path: String, text: String },
    /// One non-whitespace character of the text run at `path`, preceded by a
    /// single space when whitespace came before it inside the run.
    TextDelta { path: String, delta: String },
    /// The verbatim body of a `<![CDATA[...]]>` section, addressed at the
    /// enclosing element.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "cdata"))]
    CData { path: String, content: String },
    Doctype { name: String },
    /// A `<?name attrs?>` processing instruction.
    Instruction { name: String, attributes: Attributes },
    End,
}

impl TagEvent {
    /// The node address this event refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            TagEvent::OpenTag { path, .. }
            | TagEvent::CloseTag { path, .. }
            | TagEvent::Text { path, .. }
            | TagEvent::TextDelta { path, .. }
            | TagEvent::CData { path, .. } => Some(path),
            TagEvent::Doctype { .. } | TagEvent::Instruction { .. } | TagEvent::End => None,
        }
    }
}
