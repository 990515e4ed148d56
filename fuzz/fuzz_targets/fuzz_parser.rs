#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};
use streamtrace::{JsonEvent, JsonParser, JsonParserOptions, ParserError, TagEvent, TagParser};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Fragments models wrap around or splice into documents.
static NOISE: &[&str] = &[
    " ", "\n", "\t", "Sure! ", "```json\n", "\n```", ",", ":", "'", "\u{201C}", "\u{201D}",
    "<p>", "</p>", "<br/>", "<!-- c -->", "<![CDATA[x]]>", "<script>1 < 2</script>",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;
            prefix += append_noise(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, limit);
            prefix += append_noise(&mut data[prefix..], limit);
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends up to a few noise fragments without exceeding `limit`.
fn append_noise(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let mut written = 0;
        for _ in 0..rng.random_range(0..=3) {
            let piece = NOISE[rng.random_range(0..NOISE.len())].as_bytes();
            if written + piece.len() > limit {
                break;
            }
            buf[written..written + piece.len()].copy_from_slice(piece);
            written += piece.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("serializable value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fn trace_json(auto_fix: bool, chunks: &[&str]) -> (Vec<JsonEvent>, Result<(), ParserError>) {
    let mut parser = JsonParser::new(JsonParserOptions {
        auto_fix,
        ..Default::default()
    });
    let mut events = Vec::new();
    for chunk in chunks {
        if let Err(err) = parser.trace(chunk, &mut events) {
            return (events, Err(err));
        }
    }
    let end = parser.end();
    (events, end)
}

fn trace_tags(chunks: &[&str]) -> Vec<TagEvent> {
    let mut parser = TagParser::default();
    let mut events = Vec::new();
    for chunk in chunks {
        parser.trace(chunk, &mut events);
    }
    parser.end(&mut events);
    events
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let data = &data[HEADER..];
    if data.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(data).into_owned();
    let chunks = split_into_safe_chunks(&text, split_seed);

    let auto_fix = flags & 1 != 0;
    let whole = trace_json(auto_fix, &[&text]);
    let split = trace_json(auto_fix, &chunks);
    assert_eq!(whole, split, "json events depend on chunking");
    if let (events, Ok(())) = &whole {
        let finishes = events
            .iter()
            .filter(|e| matches!(e, JsonEvent::Finish { .. }))
            .count();
        assert_eq!(finishes, 1, "a finished document emits exactly one finish");
    }

    if flags & 2 != 0 {
        let whole = trace_tags(&[&text]);
        let split = trace_tags(&chunks);
        assert_eq!(whole, split, "tag events depend on chunking");
        assert_eq!(whole.last(), Some(&TagEvent::End));
    }
}

fuzz_target!(|data: &[u8]| parser(data));

/// Splits `serialized` into chunks of at least one byte, each ending on a
/// UTF-8 boundary, with sizes derived from `split_seed`.
fn split_into_safe_chunks(serialized: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = serialized.len();

    while start < len {
        let remaining = len - start;
        let mut size = (split_seed as usize % remaining) + 1;
        while start + size < len && !serialized.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&serialized[start..start + size]);
        start += size;
    }

    chunks
}
