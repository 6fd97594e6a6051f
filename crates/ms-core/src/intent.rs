//! Intent categories (level3 of the taxonomy).
//!
//! The set is closed: five actionable intents plus the `requires_review`
//! fallback. All labels serialize as `snake_case`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Purpose of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    UrgentEscalation,
    StatusInquiry,
    Complaint,
    AdditionalInfo,
    ServiceRequest,
    RequiresReview,
}

impl IntentLabel {
    /// Every label, in canonical description order.
    pub const ALL: [Self; 6] = [
        Self::UrgentEscalation,
        Self::StatusInquiry,
        Self::Complaint,
        Self::AdditionalInfo,
        Self::ServiceRequest,
        Self::RequiresReview,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UrgentEscalation => "urgent_escalation",
            Self::StatusInquiry => "status_inquiry",
            Self::Complaint => "complaint",
            Self::AdditionalInfo => "additional_info",
            Self::ServiceRequest => "service_request",
            Self::RequiresReview => "requires_review",
        }
    }

    /// Whether this is the unresolved fallback category.
    #[must_use]
    pub const fn requires_review(self) -> bool {
        matches!(self, Self::RequiresReview)
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::UnknownIntent(s.to_string()))
    }
}

/// Intent label plus a confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub label: IntentLabel,
    pub confidence: f64,
}

impl IntentResult {
    /// Build a result, clamping `confidence` into `[0, 1]`.
    ///
    /// A NaN confidence is treated as `0.0`.
    #[must_use]
    pub fn new(label: IntentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }
}
