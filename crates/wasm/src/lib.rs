use deckscan_core::{Position, SourceDocument, collect_events};
use deckscan_lang::LanguageOptions;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Options
// ============================================================================

fn parse_options(options: JsValue) -> Result<LanguageOptions, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(LanguageOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn position(line: u32, character: u32) -> Position {
    Position::new(line as usize, character as usize)
}

// ============================================================================
// Parse API
// ============================================================================

/// Runs one parse pass and returns every event in emission order.
///
/// Events are tagged objects (`{ type: "directive", ... }`) framed by
/// `startParse` and `endParse`.
#[wasm_bindgen(js_name = parseDirectives)]
pub fn parse_directives(text: &str) -> Result<JsValue, JsError> {
    let document = SourceDocument::new(text);
    let events = collect_events(&document).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&events)
}

/// Whether the document opts into slide deck features with `marp: true`.
#[wasm_bindgen(js_name = isMarpDocument)]
pub fn is_marp_document(text: &str) -> bool {
    deckscan_core::is_marp_document(text)
}

// ============================================================================
// Language API
// ============================================================================

/// Diagnoses a document.
///
/// # Arguments
///
/// * `text` - Markdown source
/// * `options` - Optional `LanguageOptions` object (camelCase keys)
#[wasm_bindgen]
pub fn diagnose(text: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options = parse_options(options)?.resolve();
    let document = SourceDocument::new(text);
    let diagnostics = deckscan_lang::diagnose(&document, &options)
        .map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;
    to_js(&diagnostics)
}

/// Hover help for the directive key at a zero-based line and UTF-16 column.
///
/// Returns `undefined` when nothing is hovered.
#[wasm_bindgen]
pub fn hover(text: &str, line: u32, character: u32) -> Result<JsValue, JsError> {
    let document = SourceDocument::new(text);
    let found = deckscan_lang::hover(&document, position(line, character))
        .map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;
    to_js(&found)
}

/// Completion items at a zero-based line and UTF-16 column.
#[wasm_bindgen]
pub fn complete(
    text: &str,
    line: u32,
    character: u32,
    options: JsValue,
) -> Result<JsValue, JsError> {
    let options = parse_options(options)?.resolve();
    let document = SourceDocument::new(text);
    let items = deckscan_lang::complete(&document, position(line, character), &options)
        .map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;
    to_js(&items)
}

/// Ranges of recognised directives for editor decorations.
#[wasm_bindgen]
pub fn annotate(text: &str) -> Result<JsValue, JsError> {
    let document = SourceDocument::new(text);
    let annotations =
        deckscan_lang::annotate(&document).map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;
    to_js(&annotations)
}
