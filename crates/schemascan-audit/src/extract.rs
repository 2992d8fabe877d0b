//! DOM-aware content extraction.
//!
//! Extraction runs over the browser-rendered HTML and never fails: a page
//! with no schema markup yields an empty block list, and a JSON-LD block
//! that does not parse is carried through as opaque text rather than
//! aborting the scan.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::borrow::Cow;

static JSON_LD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid JSON-LD selector")
});

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Subtrees that never contribute visible text.
const NON_VISIBLE_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Content extracted from a rendered page.
///
/// Transient: produced per request, never persisted.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// JSON-LD blocks in document order. Parsed where possible; blocks
    /// that fail to parse appear as `Value::String` with the raw text.
    pub json_ld: Vec<Value>,
    /// Whitespace-normalized, hidden-node-filtered page text.
    pub visible_text: String,
}

impl ExtractedContent {
    /// Whether the page carried any schema markup at all.
    #[must_use]
    pub fn has_schema(&self) -> bool {
        !self.json_ld.is_empty()
    }
}

/// Extracts JSON-LD blocks and visible text from rendered HTML.
pub struct ContentExtractor;

impl ContentExtractor {
    /// Extract structured data and visible text from a rendered document.
    ///
    /// Infallible by design: extraction over a successfully rendered page
    /// always produces a result, possibly empty.
    #[must_use]
    pub fn extract(html: &str) -> ExtractedContent {
        let document = Html::parse_document(html);

        ExtractedContent {
            json_ld: collect_json_ld(&document),
            visible_text: collect_visible_text(&document),
        }
    }
}

/// Collect every `application/ld+json` script block in document order.
///
/// A top-level JSON array is flattened into its member blocks. A block
/// that fails to parse is kept as an opaque string so the analyzer still
/// sees the malformed markup.
fn collect_json_ld(document: &Html) -> Vec<Value> {
    let mut blocks = Vec::new();

    for script in document.select(&JSON_LD_SELECTOR) {
        let raw: String = script.text().collect();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => blocks.extend(items),
            Ok(value) => blocks.push(value),
            Err(e) => {
                tracing::debug!("unparseable JSON-LD block kept as raw text: {}", e);
                blocks.push(Value::String(trimmed.to_string()));
            }
        }
    }

    blocks
}

/// Collect visible text by walking the DOM explicitly.
///
/// Hidden subtrees are never descended: the `hidden` attribute and inline
/// `display:none` / `visibility:hidden` / `opacity:0` styles exclude an
/// element and everything under it. Script, style, noscript, and template
/// subtrees are skipped outright. The result is trimmed with internal
/// whitespace runs collapsed to single spaces.
fn collect_visible_text(document: &Html) -> String {
    let mut parts: Vec<String> = Vec::new();
    walk_visible(document.root_element(), &mut parts);

    WHITESPACE_RUNS
        .replace_all(parts.join(" ").trim(), " ")
        .into_owned()
}

fn walk_visible(element: ElementRef, parts: &mut Vec<String>) {
    let tag = element.value().name();
    if NON_VISIBLE_TAGS.contains(&tag) {
        return;
    }
    if is_hidden(element) {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            walk_visible(child_element, parts);
        }
    }
}

/// Whether an element is hidden via attribute or inline style.
///
/// Stylesheet-class hiding is not resolved here; see DESIGN.md.
fn is_hidden(element: ElementRef) -> bool {
    if element.value().attr("hidden").is_some() {
        return true;
    }

    element
        .value()
        .attr("style")
        .is_some_and(has_hiding_declaration)
}

fn has_hiding_declaration(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let mut parts = declaration.splitn(2, ':');
        let (Some(property), Some(value)) = (parts.next(), parts.next()) else {
            return false;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();

        matches!(
            (property.as_str(), value.as_str()),
            ("display", "none") | ("visibility", "hidden") | ("opacity", "0" | "0.0")
        )
    })
}

/// Truncate text to at most `cap` characters (suffix cut, not semantic).
///
/// Returns the possibly-shortened text and whether truncation happened.
/// Idempotent: re-truncating already-truncated text is a no-op.
#[must_use]
pub fn truncate_chars(text: &str, cap: usize) -> (Cow<'_, str>, bool) {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => (Cow::Borrowed(&text[..byte_idx]), true),
        None => (Cow::Borrowed(text), false),
    }
}
