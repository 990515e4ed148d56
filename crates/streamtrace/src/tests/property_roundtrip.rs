//! Properties over valid documents: the decoder agrees with a reference
//! decoder, string leaves can be rebuilt from their deltas, other scalars
//! arrive whole, and auto-fix leaves valid input alone.

use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;

use super::arbitrary::Document;
use crate::{JsonEvent, JsonParser, JsonParserOptions, Value, value::write_escaped_string};

fn tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if cfg!(feature = "test-fast") {
        50
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    };
    #[cfg(miri)]
    let tests = 10;
    tests
}

fn decode(src: &str, options: JsonParserOptions) -> Option<Vec<JsonEvent>> {
    let mut parser = JsonParser::new(options);
    let mut events = Vec::new();
    parser.trace(src, &mut events).ok()?;
    parser.end().ok()?;
    Some(events)
}

/// Every leaf of `value` with its URI; `uri` is `None` at the root. Keys
/// appear in URIs as they are written in the document, escapes included.
fn leaves<'a>(value: &'a Value, uri: Option<&str>, out: &mut Vec<(String, &'a Value)>) {
    let join = |segment: &str| match uri {
        Some(uri) => format!("{uri}/{segment}"),
        None => segment.to_string(),
    };
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                leaves(item, Some(&join(&i.to_string())), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let mut written = String::new();
                let _ = write_escaped_string(k, &mut written);
                leaves(v, Some(&join(&written)), out);
            }
        }
        leaf => out.push((uri.unwrap_or_default().to_string(), leaf)),
    }
}

#[test]
fn roundtrip_against_serde_json_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> TestResult {
        let src = doc.0.to_string();
        let Ok(reference) = serde_json::from_str::<Value>(&src) else {
            return TestResult::discard();
        };
        let Some(events) = decode(&src, JsonParserOptions::default()) else {
            return TestResult::failed();
        };
        let finishes: Vec<&Value> = events
            .iter()
            .filter_map(|e| match e {
                JsonEvent::Finish { value } => Some(value),
                _ => None,
            })
            .collect();
        TestResult::from_bool(finishes == [&reference] && reference == doc.0)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Document) -> TestResult);
}

#[test]
fn leaves_rebuild_from_deltas_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let Some(events) = decode(&doc.0.to_string(), JsonParserOptions::default()) else {
            return false;
        };
        let mut strings: BTreeMap<&str, String> = BTreeMap::new();
        let mut scalars: BTreeMap<&str, Vec<&Value>> = BTreeMap::new();
        let mut resolved: BTreeMap<&str, &str> = BTreeMap::new();
        for event in &events {
            match event {
                JsonEvent::Data {
                    uri,
                    delta: Value::String(s),
                    ..
                } => strings.entry(uri.as_str()).or_default().push_str(s),
                JsonEvent::Data { uri, delta, .. } => {
                    scalars.entry(uri.as_str()).or_default().push(delta);
                }
                JsonEvent::StringResolve { uri, delta } => {
                    resolved.insert(uri.as_str(), delta.as_str());
                }
                JsonEvent::Finish { .. } => {}
            }
        }

        let mut expected = Vec::new();
        leaves(&doc.0, None, &mut expected);
        expected.iter().all(|(uri, leaf)| match leaf {
            Value::String(s) => {
                strings.get(uri.as_str()).map_or("", String::as_str) == s.as_str()
                    && resolved.get(uri.as_str()) == Some(&s.as_str())
            }
            _ => scalars.get(uri.as_str()).is_some_and(|v| v.len() == 1 && v[0] == *leaf),
        })
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Document) -> bool);
}

#[test]
fn auto_fix_leaves_valid_input_alone_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let src = doc.0.to_string();
        let strict = decode(&src, JsonParserOptions::default());
        let fixed = decode(
            &src,
            JsonParserOptions {
                auto_fix: true,
                ..Default::default()
            },
        );
        strict.is_some() && strict == fixed
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Document) -> bool);
}

const KEY_ALPHABET: [char; 6] = ['a', 'b', ':', ' ', '\'', '\u{2019}'];

/// Keys where auto-fix reads a missing closing quote: a `:` before
/// whitespace, or a quote-like character before `:`.
fn reads_as_unclosed(key: &str) -> bool {
    let chars: Vec<char> = key.chars().collect();
    chars.iter().enumerate().any(|(i, &c)| {
        let mut rest = chars[i + 1..].iter().copied();
        match c {
            ':' => rest.next().is_some_and(char::is_whitespace),
            '\'' | '\u{2019}' => rest.find(|n| !n.is_whitespace()) == Some(':'),
            _ => false,
        }
    })
}

#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn keys_with_colons_and_apostrophes_are_kept(picks: Vec<u8>) -> TestResult {
    let key: String = picks
        .iter()
        .map(|&i| KEY_ALPHABET[usize::from(i) % KEY_ALPHABET.len()])
        .collect();
    if reads_as_unclosed(&key) {
        return TestResult::discard();
    }
    let src = format!(r#"{{"{key}": 1}}"#);
    let strict = decode(&src, JsonParserOptions::default());
    let fixed = decode(
        &src,
        JsonParserOptions {
            auto_fix: true,
            ..Default::default()
        },
    );
    let kept = strict.as_ref().is_some_and(|events| {
        events.contains(&JsonEvent::Data {
            uri: key.clone(),
            delta: Value::Number(1.0),
            error: None,
        })
    });
    TestResult::from_bool(kept && strict == fixed)
}
