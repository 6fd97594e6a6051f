use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply/forward prefixes stripped when normalizing subjects.
const SUBJECT_PREFIXES: [&str; 4] = ["re:", "fw:", "fwd:", "rv:"];

/// Languages the cleaning stage accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Es,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One email from an export, after key normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub message_id: String,
    pub conversation_id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Set by the cleaning stage.
    pub language: Option<Language>,
}

impl EmailRecord {
    /// Minimal record; recipients, date, attachments and language empty.
    #[must_use]
    pub fn new(
        message_id: impl Into<String>,
        conversation_id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            conversation_id: conversation_id.into(),
            subject: subject.into(),
            body: body.into(),
            sender: sender.into(),
            to: Vec::new(),
            cc: Vec::new(),
            date: None,
            attachments: Vec::new(),
            language: None,
        }
    }

    /// Lower-cased subject with any chain of `re:`/`fw:`/`fwd:`/`rv:` removed.
    #[must_use]
    pub fn normalized_subject(&self) -> String {
        let mut subject = self.subject.trim().to_lowercase();
        loop {
            let Some(rest) = SUBJECT_PREFIXES
                .iter()
                .find_map(|prefix| subject.strip_prefix(prefix))
            else {
                return subject;
            };
            subject = rest.trim().to_string();
        }
    }
}
