//! Entity structs produced by ingestion and threading.

mod conversation;
mod email;

pub use conversation::{Conversation, ConversationMetadata};
pub use email::{EmailRecord, Language};
