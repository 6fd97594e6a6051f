//! Confidence arbitration between intent strategies.

use ms_core::IntentResult;

/// Pick the final intent from the available strategy results.
///
/// With an external result, the higher of external and rule confidence
/// wins. Otherwise the higher of embedding and rule confidence wins. Ties
/// go to the non-rule strategy.
#[must_use]
pub fn arbitrate(
    rule: IntentResult,
    embedding: Option<IntentResult>,
    external: Option<IntentResult>,
) -> IntentResult {
    match external.or(embedding) {
        Some(challenger) if challenger.confidence >= rule.confidence => challenger,
        _ => rule,
    }
}
