//! Loading email exports with heterogeneous field names.
//!
//! Accepts a single JSON file or a directory of `*.json` files. A file holds
//! an array of records, an object with an `items` array, or one record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ms_core::entities::EmailRecord;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::IngestError;

const MESSAGE_ID: &[&str] = &["message_id", "messageId", "id"];
const CONVERSATION_ID: &[&str] = &["conversation_id", "conversationId", "thread_id", "threadId"];
const SUBJECT: &[&str] = &["subject", "Subject"];
const BODY: &[&str] = &["body", "Body", "content", "Content"];
const SENDER: &[&str] = &["from", "sender", "Sender"];
const TO: &[&str] = &["to", "toRecipients", "To"];
const CC: &[&str] = &["cc", "ccRecipients", "Cc"];
const ATTACHMENTS: &[&str] = &["attachments", "attachmentNames"];
const DATE: &[&str] = &["date", "sentDateTime", "receivedDateTime"];

/// Load every record under `path`.
///
/// # Errors
///
/// Returns [`IngestError::Read`] when a file or directory cannot be read and
/// [`IngestError::Json`] when a file is not valid JSON.
pub fn load_emails(path: &Path) -> Result<Vec<EmailRecord>, IngestError> {
    let files = if path.is_dir() {
        json_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut records = Vec::new();
    for file in &files {
        let text = std::fs::read_to_string(file).map_err(|source| IngestError::Read {
            path: file.clone(),
            source,
        })?;
        records.extend(parse_export(&text, file)?);
    }
    tracing::debug!(files = files.len(), records = records.len(), "loaded emails");
    Ok(records)
}

/// Parse one export document.
///
/// # Errors
///
/// Returns [`IngestError::Json`] if `text` is not valid JSON.
pub fn parse_export(text: &str, origin: &Path) -> Result<Vec<EmailRecord>, IngestError> {
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(
        |source| IngestError::Json {
            path: origin.to_path_buf(),
            source,
        },
    )?;
    let objects = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("items".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };
    Ok(objects
        .iter()
        .filter_map(Value::as_object)
        .map(record_from_json)
        .collect())
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Normalize one record object into an [`EmailRecord`].
#[must_use]
pub fn record_from_json(obj: &Map<String, Value>) -> EmailRecord {
    let subject = first(obj, SUBJECT).map(scalar).unwrap_or_default();
    let body = first(obj, BODY).map(scalar).unwrap_or_default();
    let mut message_id = first(obj, MESSAGE_ID).map(scalar).unwrap_or_default();
    let mut conversation_id = first(obj, CONVERSATION_ID).map(scalar).unwrap_or_default();

    if conversation_id.is_empty() {
        conversation_id = if message_id.is_empty() {
            subject.trim().to_lowercase()
        } else {
            message_id.clone()
        };
    }
    if message_id.is_empty() {
        message_id = format!("msg_{:x}", Sha256::digest(format!("{subject}{body}")));
    }

    let mut record = EmailRecord::new(
        message_id,
        conversation_id,
        subject,
        body,
        first(obj, SENDER).map(address).unwrap_or_default(),
    );
    record.to = first(obj, TO).map(address_list).unwrap_or_default();
    record.cc = first(obj, CC).map(address_list).unwrap_or_default();
    record.attachments = first(obj, ATTACHMENTS).map(attachment_names).unwrap_or_default();
    record.date = first(obj, DATE).and_then(parse_date);
    record
}

/// First key whose value is present, non-null and not an empty string.
fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn address(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["address", "email", "name"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn address_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(address)
            .filter(|a| !a.is_empty())
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn attachment_names(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => ["name", "filename", "fileName"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .find(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

/// RFC 3339, a few naive layouts (read as UTC), or a Unix timestamp.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                return DateTime::from_timestamp(secs, 0);
            }
            let secs = n.as_f64()?;
            #[allow(clippy::cast_possible_truncation)]
            let millis = (secs * 1000.0).round() as i64;
            DateTime::from_timestamp_millis(millis)
        }
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
