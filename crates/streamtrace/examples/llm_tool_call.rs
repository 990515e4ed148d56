//! Reacts to a tool call while a model is still streaming it.
//!
//! The assistant was asked for a JSON object describing a code snippet. The
//! object carries a `moderation` verdict first so that the caller can abort
//! before the rest of the payload arrives:
//!
//! ```text
//! {
//!   "moderation": { "decision": "allow" | "block", "reason": string | null },
//!   "filename":   string,
//!   "code":       string
//! }
//! ```
//!
//! The reply comes wrapped in prose and a code fence, with a missing closing
//! quote on `reason`, so the decoder runs with auto-fix enabled. Fragments of
//! `code` are printed as they arrive and the verdict is acted on as soon as
//! its string resolves.
//!
//! A second stream shows the tag decoder on a markup answer.
//!
//! Run with
//!
//! ```bash
//! cargo run -p streamtrace --example llm_tool_call
//! ```

#![allow(clippy::needless_raw_string_hashes)]
#![allow(clippy::doc_markdown)]

use std::io::Write;

use streamtrace::{
    FnSink, JsonEvent, JsonParser, JsonParserOptions, ParserError, TagEvent, TagParser,
    TagParserOptions, Value,
};

#[rustfmt::skip]
const TOOL_CALL: [&str; 9] = [
    "Sure, here you go:\n```json\n{\"moderation\":{\"decision\":\"al",
    "lo",
    "w\",\"reason\":\"looks fine,\n},",
    r#""filename":"main.rs","#,
    r#""code":"fn main() {\n"#,
    r#"    let greeting = \"hi\";\n"#,
    r#"    println!(\"{greeting}\");\n"#,
    r#"}\n"}"#,
    "\n```",
];

#[rustfmt::skip]
const ANSWER: [&str; 4] = [
    "Here is the summary.\n<summary lang=\"en\"><point>Fast",
    " to start</point><point>Ea",
    "sy to stop</point>",
    "</summary>",
];

fn stream_tool_call() -> Result<(), ParserError> {
    let mut parser = JsonParser::new(JsonParserOptions {
        auto_fix: true,
        parent_path: Some("tool_calls/0".into()),
        ..Default::default()
    });

    let mut blocked = false;
    let mut stdout = std::io::stdout();
    let mut sink = FnSink(|event: JsonEvent| match event {
        JsonEvent::Data {
            uri,
            delta: Value::String(fragment),
            error: None,
        } if uri == "tool_calls/0/code" => {
            print!("{fragment}");
            let _ = stdout.flush();
        }
        JsonEvent::Data { uri, error: Some(error), .. } => {
            eprintln!("[{uri}] retracting {:?}", error.token);
        }
        JsonEvent::StringResolve { uri, delta } if uri == "tool_calls/0/moderation/decision" => {
            eprintln!("[moderation] decision = {delta}");
            blocked = delta == "block";
        }
        JsonEvent::Finish { value } => {
            eprintln!("\n[done] {value}");
        }
        _ => {}
    });

    for chunk in TOOL_CALL {
        parser.trace(chunk, &mut sink)?;
    }
    drop(sink);
    parser.end()?;

    if blocked {
        eprintln!("[moderation] response discarded");
    } else if let Some(name) = parser.value().and_then(|v| v.pointer("filename")) {
        eprintln!("[file] {name}");
    }
    Ok(())
}

fn stream_answer() {
    let mut parser = TagParser::new(TagParserOptions {
        end_on_root_close: true,
        ..Default::default()
    });
    let mut sink = FnSink(|event: TagEvent| match event {
        TagEvent::OpenTag { path, attributes, .. } => println!("open  {path} {attributes:?}"),
        TagEvent::Text { path, text } => println!("text  {path} {text:?}"),
        TagEvent::CloseTag { path, .. } => println!("close {path}"),
        TagEvent::End => println!("end"),
        _ => {}
    });
    for chunk in ANSWER {
        parser.trace(chunk, &mut sink);
    }
    parser.end(&mut sink);
}

fn main() {
    if let Err(err) = stream_tool_call() {
        eprintln!("tool call failed: {err}");
        std::process::exit(1);
    }
    stream_answer();
}
