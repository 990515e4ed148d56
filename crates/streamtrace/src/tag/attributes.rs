//! Splitting a tag body into its name and attributes.
use alloc::string::String;

use super::event::Attributes;

/// Reads one attribute value from the start of `rest`, returning the value
/// and what follows it. A quoted value runs to its closing quote; an
/// unquoted one to the next whitespace.
fn take_value(rest: &str) -> (&str, &str) {
    if let Some(quote) = rest.chars().next().filter(|c| matches!(c, '"' | '\'')) {
        let inner = &rest[1..];
        return match inner.find(quote) {
            Some(end) => (&inner[..end], &inner[end + 1..]),
            None => (inner.strip_suffix(['"', '\'']).unwrap_or(inner), ""),
        };
    }
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let value = &rest[..end];
    (value.strip_suffix(['"', '\'']).unwrap_or(value), &rest[end..])
}

/// Parses `div id="a" class='b c' hidden` into the tag name and its
/// attributes. Words without `=` become attributes with an empty value;
/// whitespace inside quoted values is kept.
pub(crate) fn parse(body: &str) -> (String, Attributes) {
    let body = body.trim();
    let name_len = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = body[..name_len].into();

    let mut attributes = Attributes::new();
    let mut rest = &body[name_len..];
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let key_len = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = &rest[..key_len];
        rest = &rest[key_len..];
        let value = match rest.trim_start().strip_prefix('=') {
            Some(after) => {
                let (value, after) = take_value(after.trim_start());
                rest = after;
                value
            }
            None => "",
        };
        if !key.is_empty() {
            attributes.insert(key.into(), value.into());
        }
    }
    (name, attributes)
}
