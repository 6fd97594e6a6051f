//! Grouping emails into conversations.

use std::collections::{BTreeSet, HashMap};

use ms_core::entities::{Conversation, ConversationMetadata, EmailRecord};

/// Group `emails` into conversations.
///
/// The thread key is the conversation id, or the normalized subject when the
/// id is blank. Groups keep first-seen order; emails inside a group are
/// ordered by date with undated emails first.
#[must_use]
pub fn build_conversations(emails: Vec<EmailRecord>) -> Vec<Conversation> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<EmailRecord>> = HashMap::new();
    for email in emails {
        let key = thread_key(&email);
        groups
            .entry(key)
            .or_insert_with_key(|key| {
                order.push(key.clone());
                Vec::new()
            })
            .push(email);
    }

    let conversations: Vec<Conversation> = order
        .into_iter()
        .filter_map(|key| {
            let emails = groups.remove(&key)?;
            Some(merge(key, emails))
        })
        .collect();
    tracing::debug!(conversations = conversations.len(), "threaded emails");
    conversations
}

fn thread_key(email: &EmailRecord) -> String {
    let id = email.conversation_id.trim();
    if id.is_empty() {
        email.normalized_subject()
    } else {
        id.to_string()
    }
}

fn merge(conversation_id: String, mut emails: Vec<EmailRecord>) -> Conversation {
    emails.sort_by_key(|email| email.date);

    let merged_subject = emails
        .first()
        .map(EmailRecord::normalized_subject)
        .unwrap_or_default();
    let merged_body = emails
        .iter()
        .map(|email| email.body.trim())
        .filter(|body| !body.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    let attachment_names: Vec<String> = emails
        .iter()
        .flat_map(|email| email.attachments.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let sender_domain = emails
        .first()
        .map_or_else(|| "unknown".to_string(), |email| sender_domain(&email.sender));

    Conversation {
        metadata: ConversationMetadata {
            sender_domain,
            thread_length: emails.len(),
            has_attachments: !attachment_names.is_empty(),
        },
        conversation_id,
        emails,
        merged_subject,
        merged_body,
        attachment_names,
    }
}

/// Lower-cased part after the last `@`, or `unknown`.
fn sender_domain(sender: &str) -> String {
    let domain = sender
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim().trim_end_matches('>'))
        .unwrap_or_default();
    if domain.is_empty() {
        "unknown".to_string()
    } else {
        domain.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn email(id: &str, conversation: &str, subject: &str, body: &str) -> EmailRecord {
        EmailRecord::new(id, conversation, subject, body, "Ana <ana@Example.COM>")
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let conversations = build_conversations(vec![
            email("1", "b", "Second", "x"),
            email("2", "a", "First", "y"),
            email("3", "b", "Re: Second", "z"),
        ]);
        let ids: Vec<&str> = conversations
            .iter()
            .map(|c| c.conversation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(conversations[0].metadata.thread_length, 2);
    }

    #[test]
    fn blank_conversation_id_threads_by_subject() {
        let conversations = build_conversations(vec![
            email("1", "", "Quote", "first"),
            email("2", " ", "RE: fw: Quote", "second"),
        ]);
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].conversation_id, "quote");
    }

    #[test]
    fn emails_are_ordered_by_date_undated_first() {
        let mut late = email("1", "c", "Re: Invoice", "late");
        late.date = Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap());
        let mut early = email("2", "c", "Invoice", "early");
        early.date = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let undated = email("3", "c", "Fwd: Invoice", "  ");

        let conversation = build_conversations(vec![late, early, undated]).remove(0);
        let ids: Vec<&str> = conversation
            .emails
            .iter()
            .map(|e| e.message_id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert_eq!(conversation.merged_subject, "invoice");
        assert_eq!(conversation.merged_body, "early\n\nlate");
    }

    #[test]
    fn attachments_and_metadata() {
        let mut a = email("1", "c", "Docs", "see attached");
        a.attachments = vec!["b.pdf".into(), "a.pdf".into()];
        let mut b = email("2", "c", "Docs", "again");
        b.attachments = vec!["a.pdf".into()];

        let conversation = build_conversations(vec![a, b]).remove(0);
        assert_eq!(conversation.attachment_names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(
            conversation.metadata,
            ConversationMetadata {
                sender_domain: "example.com".to_string(),
                thread_length: 2,
                has_attachments: true,
            }
        );
    }

    #[test]
    fn sender_without_at_is_unknown() {
        assert_eq!(sender_domain("no-address"), "unknown");
        assert_eq!(sender_domain("ops@"), "unknown");
        assert_eq!(sender_domain("ops@Mail.Example.org"), "mail.example.org");
    }
}
