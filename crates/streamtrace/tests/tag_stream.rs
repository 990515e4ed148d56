#![allow(missing_docs)]
#![allow(clippy::needless_raw_string_hashes)]

mod common;

use core::fmt::Write;

use streamtrace::{FnSink, TagEvent, TagParser, TagParserOptions};

use crate::common::MARKUP;

/// One line per event. Within a chunk, consecutive text deltas at the same
/// address are joined into one `~` line.
fn render(stream: &[&str], options: TagParserOptions) -> String {
    let mut parser = TagParser::new(options);
    let mut out = String::new();
    for chunk in stream {
        let mut events = Vec::new();
        parser.trace(chunk, &mut events);
        write_events(&mut out, events);
    }
    let mut events = Vec::new();
    parser.end(&mut events);
    write_events(&mut out, events);
    out
}

fn write_events(out: &mut String, events: Vec<TagEvent>) {
    let mut pending: Option<(String, String)> = None;
    for event in events {
        if let TagEvent::TextDelta { path, delta } = &event {
            match &mut pending {
                Some((at, text)) if at == path => text.push_str(delta),
                _ => {
                    flush(out, pending.take());
                    pending = Some((path.clone(), delta.clone()));
                }
            }
            continue;
        }
        flush(out, pending.take());
        match event {
            TagEvent::OpenTag {
                path,
                name,
                attributes,
            } => writeln!(out, "< {path} {name} {attributes:?}"),
            TagEvent::CloseTag { path, name } => writeln!(out, "> {path} {name}"),
            TagEvent::Text { path, text } => writeln!(out, "$ {path} {text:?}"),
            TagEvent::TextDelta { .. } => Ok(()),
            TagEvent::CData { path, content } => writeln!(out, "cdata {path} {content:?}"),
            TagEvent::Doctype { name } => writeln!(out, "doctype {name}"),
            TagEvent::Instruction { name, attributes } => {
                writeln!(out, "instruction {name} {attributes:?}")
            }
            TagEvent::End => writeln!(out, "end"),
        }
        .unwrap();
    }
    flush(out, pending);
}

fn flush(out: &mut String, pending: Option<(String, String)>) {
    if let Some((path, text)) = pending {
        writeln!(out, "~ {path} {text:?}").unwrap();
    }
}

#[test]
fn snapshot_markup() {
    insta::assert_snapshot!(render(&MARKUP, TagParserOptions::default()), @r#"
    < /card[1] card {"id": "c1", "tone": "warm"}
    < /card[1]/title[1] title {}
    ~ /card[1]/title[1]/$$TEXTNODE[1] "Hel"
    ~ /card[1]/title[1]/$$TEXTNODE[1] "lo there"
    $ /card[1]/title[1]/$$TEXTNODE[1] "Hello there"
    > /card[1]/title[1] title
    < /card[1]/br[1] br {}
    > /card[1]/br[1] br
    < /card[1]/p[1] p {}
    ~ /card[1]/p[1]/$$TEXTNODE[1] "One"
    $ /card[1]/p[1]/$$TEXTNODE[1] "One"
    > /card[1]/p[1] p
    < /card[1]/p[2] p {}
    ~ /card[1]/p[2]/$$TEXTNODE[1] "T"
    ~ /card[1]/p[2]/$$TEXTNODE[1] "wo"
    $ /card[1]/p[2]/$$TEXTNODE[1] "Two"
    < /card[1]/p[2]/em[1] em {}
    ~ /card[1]/p[2]/em[1]/$$TEXTNODE[1] "big"
    $ /card[1]/p[2]/em[1]/$$TEXTNODE[1] "big"
    > /card[1]/p[2]/em[1] em
    > /card[1]/p[2] p
    < /card[1]/script[1] script {}
    $ /card[1]/script[1]/$$TEXTNODE[1] "let x = 1 < 2;"
    > /card[1]/script[1] script
    > /card[1] card
    ~ /$$TEXTNODE[1] "trailing"
    end
    "#);
}

#[test]
fn snapshot_markup_ending_on_root_close() {
    // Joining mid-stream: "wo " is prose before the first tag.
    let options = TagParserOptions {
        parent_path: Some("answer".into()),
        end_on_root_close: true,
    };
    let rendered = render(&MARKUP[4..], options);
    insta::assert_snapshot!(rendered, @r#"
    < answer/em[1] em {}
    ~ answer/em[1]/$$TEXTNODE[1] "big"
    $ answer/em[1]/$$TEXTNODE[1] "big"
    > answer/em[1] em
    end
    "#);
}

#[test]
fn declarations_and_sections() {
    let stream = [
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "<!DOCTYPE note>\n<note><!-- draft -->",
        "<body><![CDATA[<b>raw</b> ]]></body></note>",
    ];
    insta::assert_snapshot!(render(&stream, TagParserOptions::default()), @r#"
    instruction xml {"encoding": "UTF-8", "version": "1.0"}
    doctype note
    < /note[1] note {}
    < /note[1]/body[1] body {}
    cdata /note[1]/body[1] "<b>raw</b> "
    > /note[1]/body[1] body
    > /note[1] note
    end
    "#);
}

#[test]
fn closure_sink_sees_every_event() {
    let mut parser = TagParser::default();
    let mut opened = Vec::new();
    let mut ends = 0;
    let mut sink = FnSink(|event: TagEvent| match event {
        TagEvent::OpenTag { path, .. } => opened.push(path),
        TagEvent::End => ends += 1,
        _ => {}
    });
    for chunk in MARKUP {
        parser.trace(chunk, &mut sink);
    }
    parser.end(&mut sink);
    parser.end(&mut sink);
    drop(sink);
    assert_eq!(ends, 1);
    assert_eq!(opened.len(), 7);
    assert_eq!(opened[6], "/card[1]/script[1]");
}
