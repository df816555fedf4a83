#![cfg(target_arch = "wasm32")]

use deckscan_wasm::{annotate, complete, diagnose, hover, is_marp_document, parse_directives};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct Position {
    line: u32,
    character: u32,
}

#[derive(Deserialize, Debug)]
struct Range {
    start: Position,
    end: Position,
}

#[derive(Deserialize, Debug)]
struct Diagnostic {
    code: String,
    severity: String,
    range: Range,
}

#[derive(Deserialize, Debug)]
struct Hover {
    contents: String,
    range: Range,
}

#[derive(Deserialize, Debug)]
struct CompletionItem {
    label: String,
}

#[derive(Deserialize, Debug)]
struct Annotation {
    name: String,
    kind: String,
}

#[derive(Deserialize, Debug)]
struct Event {
    #[serde(rename = "type")]
    kind: String,
}

#[wasm_bindgen_test]
fn parse_directives_frames_events() {
    let result = parse_directives("---\nmarp: true\n---\n\n<!-- _class: lead -->\n")
        .expect("parse should succeed");
    let events: Vec<Event> = serde_wasm_bindgen::from_value(result).expect("deserialize events");
    let kinds: Vec<_> = events.iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(
        kinds,
        ["startParse", "frontMatter", "directive", "comment", "directive", "endParse"]
    );
}

#[wasm_bindgen_test]
fn diagnose_reports_unknown_theme() {
    let result = diagnose("<!-- theme: unknown -->", JsValue::UNDEFINED).expect("diagnose");
    let diagnostics: Vec<Diagnostic> =
        serde_wasm_bindgen::from_value(result).expect("deserialize diagnostics");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "unknown-theme");
    assert_eq!(diagnostics[0].severity, "warning");
    assert_eq!(diagnostics[0].range.start.character, 12);
    assert_eq!(diagnostics[0].range.end.line, 0);
}

#[wasm_bindgen_test]
fn diagnose_accepts_options() {
    let options = serde_wasm_bindgen::to_value(&custom_theme_options()).expect("options");
    let result = diagnose("<!-- theme: corporate -->", options).expect("diagnose");
    let diagnostics: Vec<Diagnostic> =
        serde_wasm_bindgen::from_value(result).expect("deserialize diagnostics");
    assert!(diagnostics.is_empty());
}

fn custom_theme_options() -> std::collections::HashMap<&'static str, Vec<&'static str>> {
    std::collections::HashMap::from([("themes", vec!["corporate"])])
}

#[wasm_bindgen_test]
fn hover_and_completion() {
    let result = hover("<!-- paginate: true -->", 0, 6).expect("hover");
    let found: Hover = serde_wasm_bindgen::from_value(result).expect("deserialize hover");
    assert!(found.contents.starts_with("**paginate**"));
    assert_eq!(found.range.start.character, 5);

    let result = hover("plain text", 0, 2).expect("hover");
    assert!(result.is_undefined() || result.is_null());

    let result = complete("<!-- math:  -->", 0, 11, JsValue::NULL).expect("complete");
    let items: Vec<CompletionItem> =
        serde_wasm_bindgen::from_value(result).expect("deserialize items");
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["katex", "mathjax"]);
}

#[wasm_bindgen_test]
fn annotations_and_marp_detection() {
    let result = annotate("<!-- _color: red -->").expect("annotate");
    let annotations: Vec<Annotation> =
        serde_wasm_bindgen::from_value(result).expect("deserialize annotations");
    assert_eq!(annotations[0].name, "color");
    assert_eq!(annotations[0].kind, "scoped");

    assert!(is_marp_document("---\nmarp: true\n---\n"));
    assert!(!is_marp_document("# no front matter"));
}
