#![allow(missing_docs)]
#![allow(clippy::needless_raw_string_hashes)]
#![allow(dead_code)]

// A tool call as a model streams it. Chunks are cut mid-string, mid-literal
// and right after separators.
#[rustfmt::skip]
pub const TOOL_CALL: [&str; 8] = [
    r#"{"name":"get_wea"#,                        // inside a string value
    r#"ther","arguments":{"city":"Par"#,          // string end -> nested object -> string
    r#"is","days":3,"#,                           // number ends on the separator
    r#""units":null,"alerts":tr"#,                // inside a literal
    r#"ue},"tags":["now","#,                      // object end -> array
    r#""hourly"],"#,                              // array end
    r#""note":"say \"hi\"\n"}"#,                  // escapes, then the root closes
    "\n",                                         // trailing whitespace
];

// The same call as a careless model writes it: prose and a code fence around
// the document, unquoted and single-quoted keys, bare strings, a malformed
// number, a missing value, a raw newline and a trailing comma.
#[rustfmt::skip]
pub const MESSY_TOOL_CALL: [&str; 5] = [
    "Sure! Here is the call:\n```json\n{name: \"get_wea",
    "ther\", 'arguments': {\"city\": Par",
    "is, \"days\": 3a, \"units\": ,\n",
    "  \"note\": \"line one\nline two\",",
    "}\n}\n```\nDone.",
];

// A markup answer: prose before the root, attributes, a void element, same
// named siblings, inline children and a script body split mid close tag.
#[rustfmt::skip]
pub const MARKUP: [&str; 6] = [
    "Here is the card:\n<card id=\"c1\" tone='warm'>",
    "<title>Hel",
    "lo there</title><br>",
    "<p>One</p><p>T",
    "wo <em>big</em></p><script>let x = 1 < 2;</scr",
    "ipt></card>\ntrailing",
];

#[test]
fn tool_call_is_valid_json() {
    let streamed = TOOL_CALL.join("");
    let value: serde_json::Value = serde_json::from_str(&streamed).unwrap();
    assert_eq!(value["arguments"]["city"], "Paris");
}
