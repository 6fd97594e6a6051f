//! # ms-ingest
//!
//! Turns raw email exports into conversations ready for embedding.
//!
//! - [`loader`]: heterogeneous JSON exports to [`EmailRecord`](ms_core::entities::EmailRecord)s
//! - [`cleaning`]: boilerplate stripping, language detection, spam filter, deduplication
//! - [`threading`]: grouping by thread key into [`Conversation`](ms_core::entities::Conversation)s
//! - [`event`]: storage queue envelopes naming an export blob

pub mod cleaning;
pub mod error;
pub mod event;
pub mod loader;
pub mod threading;

pub use cleaning::{Cleaner, deduplicate};
pub use error::IngestError;
pub use event::{classified_output_name, find_blob_name, parse_event_message};
pub use loader::load_emails;
pub use threading::build_conversations;
