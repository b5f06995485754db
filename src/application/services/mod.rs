mod chat_service;
mod prompt_builder;
mod response_formatter;
mod typing_renderer;

pub use chat_service::{AnswerStream, ChatError, ChatReply, ChatService, UploadReceipt};
pub use prompt_builder::build_prompt;
pub use response_formatter::{
    OutputFormat, ResponseBlock, format_response, parse_blocks, render_html, render_markdown,
};
pub use typing_renderer::{DEFAULT_TYPING_DELAY, TypingRenderer};
