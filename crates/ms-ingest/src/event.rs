//! Storage queue event envelopes announcing a new export blob.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Decode a queue message: plain JSON, or base64-encoded JSON.
#[must_use]
pub fn parse_event_message(content: &str) -> Option<Value> {
    let content = content.trim();
    if let Ok(value) = serde_json::from_str(content) {
        return Some(value);
    }
    let decoded = STANDARD.decode(content).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    serde_json::from_str(text.trim_start_matches('\u{feff}')).ok()
}

/// Blob name referenced by one event, relative to `container`.
///
/// Reads `data.url` after `/<container>/`, falling back to `subject` after
/// `/containers/<container>/blobs/`.
#[must_use]
pub fn extract_blob_name(event: &Value, container: &str) -> Option<String> {
    let from_url = event
        .pointer("/data/url")
        .and_then(Value::as_str)
        .and_then(|url| after_marker(url, &format!("/{container}/")));
    from_url.or_else(|| {
        event
            .get("subject")
            .and_then(Value::as_str)
            .and_then(|subject| after_marker(subject, &format!("/containers/{container}/blobs/")))
    })
}

/// First blob name found in a message holding one event or a list of events.
#[must_use]
pub fn find_blob_name(message: &Value, container: &str) -> Option<String> {
    match message {
        Value::Array(events) => events
            .iter()
            .find_map(|event| extract_blob_name(event, container)),
        event => extract_blob_name(event, container),
    }
}

fn after_marker(haystack: &str, marker: &str) -> Option<String> {
    let start = haystack.find(marker)? + marker.len();
    let name = haystack[start..].trim_start_matches('/');
    (!name.is_empty()).then(|| name.to_string())
}

/// Output blob name: the extension of the last path segment replaced by
/// `.classified.json`.
#[must_use]
pub fn classified_output_name(blob_name: &str) -> String {
    let segment_start = blob_name.rfind('/').map_or(0, |i| i + 1);
    let stem_end = blob_name[segment_start..]
        .rfind('.')
        .filter(|&dot| !blob_name[segment_start..][..dot].trim_start_matches('.').is_empty())
        .map_or(blob_name.len(), |dot| segment_start + dot);
    format!("{}.classified.json", &blob_name[..stem_end])
}
