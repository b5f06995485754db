mod documents;
mod error;
mod health;
mod questions;
mod sessions;

pub use documents::upload_document_handler;
pub use error::{ErrorBody, ErrorResponse};
pub use health::health_handler;
pub use questions::ask_handler;
pub use sessions::{create_session_handler, reset_session_handler, session_messages_handler};
