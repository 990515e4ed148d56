//! The materialized document.
//!
//! [`Value`] is what the JSON decoder hands over in its `finish` event and
//! what every scalar `data` delta carries. Its [`Display`](core::fmt::Display)
//! output is compact, valid JSON.
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::Write as _;

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value.
///
/// # Examples
///
/// ```
/// use streamtrace::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("name".to_string(), Value::from("bearbobo"));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"name":"bearbobo"}"#);
/// assert_eq!(v.pointer("name").and_then(Value::as_str), Some("bearbobo"));
/// ```
// Untagged, so the serde form is plain JSON.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        let mut s = String::new();
        s.push(v);
        Self::String(s)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a descendant by a `/`-separated URI as found in `data`
    /// events (`"school/1"`, `"moderation/decision"`).
    ///
    /// Segments address object keys verbatim and array elements by decimal
    /// index. The empty URI returns `self`.
    ///
    /// Keys containing `/` cannot be addressed.
    #[must_use]
    pub fn pointer(&self, uri: &str) -> Option<&Value> {
        if uri.is_empty() {
            return Some(self);
        }
        uri.split('/').try_fold(self, |node, segment| match node {
            Self::Object(map) => map.get(segment),
            Self::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

/// Writes `src` as the body of a JSON string literal.
///
/// Quotes, backslashes, control characters of the basic multilingual plane
/// and the two Unicode line separators are escaped; everything else is
/// written as is.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() && (c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            // Finite by construction; `Display` for f64 is plain decimal.
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_char(']')
            }
            Value::Object(map) => {
                f.write_char('{')?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_char('}')
            }
        }
    }
}
