mod document;
mod document_id;
mod message;
mod message_id;
mod message_role;
mod session;
mod session_id;

pub use document::{Document, LoadedDocument};
pub use document_id::DocumentId;
pub use message::Message;
pub use message_id::MessageId;
pub use message_role::MessageRole;
pub use session::Session;
pub use session_id::SessionId;
