//! Loading a directory of exports through cleaning and threading.

use std::fs;

use ms_core::entities::Language;
use ms_ingest::{Cleaner, build_conversations, deduplicate, load_emails};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn write_exports(dir: &TempDir) {
    let outlook = json!({
        "items": [
            {
                "messageId": "m1",
                "conversationId": "thread-1",
                "Subject": "Quote for office cleaning",
                "Body": "Please send the quote for the office.\nSent from my iPhone",
                "sender": {"address": "ana@Client.com"},
                "sentDateTime": "2024-03-01T10:00:00Z",
                "attachmentNames": [{"name": "floorplan.pdf"}]
            },
            {
                "messageId": "m2",
                "conversationId": "thread-1",
                "Subject": "RE: Quote for office cleaning",
                "Body": "Thank you, we will review it.\nOn Fri, Bob wrote:\n> earlier",
                "sender": "bob@vendor.com",
                "sentDateTime": "2024-03-02T10:00:00Z"
            }
        ]
    });
    let plain = json!([
        {
            "id": "m3",
            "subject": "Cotización de limpieza",
            "body": "Hola, por favor envíen la cotización del servicio.\nSaludos, Luis",
            "from": "luis@cliente.es",
            "date": "2024-03-03"
        },
        {
            "id": "m4",
            "subject": "Cotización de limpieza",
            "body": "Hola, por favor envíen la cotización del servicio.",
            "from": "luis@cliente.es"
        },
        {
            "id": "m5",
            "subject": "You won",
            "body": "Claim your lottery prize, click here",
            "from": "spam@spam.biz"
        },
        {"id": "m6", "subject": "", "body": "no subject", "from": "x@y.z"}
    ]);
    fs::write(dir.path().join("a_outlook.json"), outlook.to_string()).unwrap();
    fs::write(dir.path().join("b_plain.json"), plain.to_string()).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
}

#[test]
fn directory_export_flows_into_conversations() {
    let dir = TempDir::new().unwrap();
    write_exports(&dir);

    let emails = load_emails(dir.path()).unwrap();
    assert_eq!(emails.len(), 6);
    assert_eq!(emails[0].message_id, "m1");

    let (kept, removed) = Cleaner::new().unwrap().filter_emails(emails);
    let removed_ids: Vec<&str> = removed.iter().map(|e| e.message_id.as_str()).collect();
    assert_eq!(removed_ids, vec!["m5", "m6"]);

    let unique = deduplicate(kept);
    let ids: Vec<&str> = unique.iter().map(|e| e.message_id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3"]);
    assert_eq!(unique[2].language, Some(Language::Es));

    let conversations = build_conversations(unique);
    assert_eq!(conversations.len(), 2);

    let office = &conversations[0];
    assert_eq!(office.conversation_id, "thread-1");
    assert_eq!(office.merged_subject, "quote for office cleaning");
    assert_eq!(
        office.merged_body,
        "Please send the quote for the office.\n\nThank you, we will review it."
    );
    assert_eq!(office.attachment_names, vec!["floorplan.pdf"]);
    assert_eq!(office.metadata.sender_domain, "client.com");

    assert_eq!(conversations[1].conversation_id, "m3");
}

#[test]
fn missing_path_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = load_emails(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("absent.json"), "{err}");
}
