//! Keyword-rule intent strategy.
//!
//! Bilingual (English/Spanish) substring rules over the lower-cased text.
//! When several categories match, the fixed priority order decides:
//! urgent escalation, complaint, status inquiry, service request,
//! additional info.

use ms_core::{IntentLabel, IntentResult};

/// Confidence when no rule matches.
pub const NO_MATCH_CONFIDENCE: f64 = 0.4;

/// Rules in priority order with their confidence.
const RULES: [(IntentLabel, f64, &[&str]); 5] = [
    (
        IntentLabel::UrgentEscalation,
        0.85,
        &["urgent", "asap", "immediate", "urgente", "inmediato"],
    ),
    (
        IntentLabel::Complaint,
        0.80,
        &["complaint", "issue", "problem", "reclamo", "queja"],
    ),
    (
        IntentLabel::StatusInquiry,
        0.75,
        &["status", "update", "avance", "estado", "seguimiento"],
    ),
    (
        IntentLabel::ServiceRequest,
        0.70,
        &["request", "quote", "cotizacion", "need", "solicito"],
    ),
    (
        IntentLabel::AdditionalInfo,
        0.65,
        &["attached", "adjunto", "additional info", "informacion adicional"],
    ),
];

/// Classify `text` by the highest-priority matching rule.
#[must_use]
pub fn classify(text: &str) -> IntentResult {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, _, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or_else(
            || IntentResult::new(IntentLabel::RequiresReview, NO_MATCH_CONFIDENCE),
            |&(label, confidence, _)| IntentResult::new(label, confidence),
        )
}
