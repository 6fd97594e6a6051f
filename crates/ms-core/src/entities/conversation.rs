use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::EmailRecord;

/// Thread-level metadata carried into the embedding text and the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub sender_domain: String,
    pub thread_length: usize,
    pub has_attachments: bool,
}

/// A group of emails sharing a thread key, merged into one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub emails: Vec<EmailRecord>,
    pub merged_subject: String,
    pub merged_body: String,
    pub attachment_names: Vec<String>,
    pub metadata: ConversationMetadata,
}

impl Conversation {
    /// Text handed to the embedder and the intent classifier.
    ///
    /// Subject and body, then an `Attachments:` line and a `Metadata:` line of
    /// `key:value` tokens.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        let mut text = format!("{}\n{}", self.merged_subject, self.merged_body);
        if !self.attachment_names.is_empty() {
            let _ = write!(text, "\nAttachments: {}", self.attachment_names.join(", "));
        }
        let _ = write!(
            text,
            "\nMetadata: sender_domain:{} thread_length:{} has_attachments:{}",
            self.metadata.sender_domain, self.metadata.thread_length, self.metadata.has_attachments
        );
        text.trim().to_string()
    }
}
