use alloc::string::String;

/// Configuration for [`JsonParser`](crate::JsonParser).
///
/// # Examples
///
/// ```rust
/// use streamtrace::{JsonParser, JsonParserOptions};
///
/// let parser = JsonParser::new(JsonParserOptions {
///     auto_fix: true,
///     parent_path: Some("tool/args".into()),
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// Strict decoding, no URI prefix, no logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonParserOptions {
    /// Whether to repair the malformations language models commonly produce
    /// instead of failing on them.
    ///
    /// Repairs cover missing values, unquoted or half-quoted keys and
    /// values, stray quotes, typographic quote characters around keys, raw
    /// newlines inside strings, malformed literals and numbers, and prose
    /// before or after the document. Input no repair rule covers still fails
    /// with [`InvalidToken`](crate::ErrorKind::InvalidToken).
    ///
    /// # Default
    ///
    /// `false`
    pub auto_fix: bool,

    /// Prefix for every URI in emitted events.
    ///
    /// With `Some("x/y")` the value of key `e` is reported at `x/y/e`. Useful
    /// when the decoded document is embedded in a larger addressed structure.
    ///
    /// # Default
    ///
    /// `None`
    pub parent_path: Option<String>,

    /// Whether to log every state transition and every applied repair
    /// through `tracing` at debug level.
    ///
    /// # Default
    ///
    /// `false`
    pub debug: bool,
}
