use alloc::string::String;

/// Configuration for [`TagParser`](crate::TagParser).
///
/// # Default
///
/// Addresses start at the document root and [`TagEvent::End`](crate::TagEvent::End)
/// is only emitted by an explicit call to
/// [`TagParser::end`](crate::TagParser::end).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagParserOptions {
    /// Prefix for every node address.
    ///
    /// With `Some("reply")` the first `div` is reported at `reply/div[1]`.
    ///
    /// # Default
    ///
    /// `None`, giving addresses such as `/div[1]/p[2]`.
    pub parent_path: Option<String>,

    /// Whether to emit `End` on its own once the first element has closed
    /// and no element remains open.
    ///
    /// Useful when the markup is a single root element followed by prose the
    /// caller does not care about. Left off, markup and text after the root
    /// keep being reported until [`TagParser::end`](crate::TagParser::end),
    /// so several top-level elements can share one stream.
    ///
    /// # Default
    ///
    /// `false`
    pub end_on_root_close: bool,
}
