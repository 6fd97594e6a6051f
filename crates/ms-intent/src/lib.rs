//! # ms-intent
//!
//! Intent (level3) classification for mailsort conversations.
//!
//! Three independent strategies:
//! - [`rules`]: bilingual keyword rules with fixed priority and confidence
//! - [`semantic`]: cosine similarity to canonical category descriptions
//! - [`external`]: an Azure OpenAI chat deployment, when configured
//!
//! [`arbitrate`] picks the final answer; [`IntentClassifier`] wires the
//! strategies together.

pub mod arbitration;
mod classifier;
pub mod error;
pub mod external;
pub mod rules;
pub mod semantic;

pub use arbitration::arbitrate;
pub use classifier::IntentClassifier;
pub use error::IntentError;
pub use external::ExternalClassifier;
