//! Embedded JSON extraction from platform HTML pages
//!
//! Listing and watch pages ship their initial state as JavaScript
//! assignments (`var ytInitialData = {...};`) inside `<script>` tags. This
//! module finds such an assignment and parses the object that follows it.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

/// Variable holding the listing page's initial payload
pub const INITIAL_DATA_VAR: &str = "ytInitialData";

/// Variable holding the watch page's player response
pub const PLAYER_RESPONSE_VAR: &str = "ytInitialPlayerResponse";

/// Finds `<variable> = {...}` in the page scripts and parses the object
///
/// Script bodies are searched first; if the document has no matching script
/// (fragments, odd markup) the raw HTML is searched instead. Returns `None`
/// when no assignment parses to a JSON object.
///
/// # Example
///
/// ```
/// use channel_sweep::crawler::extract_assigned_json;
///
/// let html = r#"<script>var ytInitialData = {"a": {"b": "};"}};</script>"#;
/// let value = extract_assigned_json(html, "ytInitialData").unwrap();
/// assert_eq!(value["a"]["b"], "};");
/// ```
pub fn extract_assigned_json(html: &str, variable: &str) -> Option<Value> {
    let pattern = assignment_pattern(variable)?;

    let document = Html::parse_document(html);
    if let Ok(selector) = Selector::parse("script") {
        for script in document.select(&selector) {
            let body: String = script.text().collect();
            if let Some(value) = find_assigned_object(&body, &pattern) {
                return Some(value);
            }
        }
    }

    find_assigned_object(html, &pattern)
}

fn assignment_pattern(variable: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\s*=\s*", regex::escape(variable))).ok()
}

/// Parses the first JSON object directly following any match of `pattern`
///
/// The object is read with a streaming deserializer, so braces or `};`
/// inside string values don't cut it short, and trailing script is ignored.
fn find_assigned_object(text: &str, pattern: &Regex) -> Option<Value> {
    pattern.find_iter(text).find_map(|assignment| {
        let rest = &text[assignment.end()..];
        if !rest.starts_with('{') {
            return None;
        }
        let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match values.next() {
            Some(Ok(value @ Value::Object(_))) => Some(value),
            _ => None,
        }
    })
}
