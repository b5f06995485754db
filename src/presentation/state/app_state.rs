use std::sync::Arc;

use crate::application::ports::{FileLoader, LlmClient};
use crate::application::services::{ChatService, OutputFormat, TypingRenderer};

pub struct AppState<F, L>
where
    F: FileLoader + ?Sized,
    L: LlmClient + ?Sized,
{
    pub chat_service: Arc<ChatService<F, L>>,
    pub typing_renderer: TypingRenderer,
    pub default_format: OutputFormat,
    pub max_upload_bytes: usize,
}

impl<F, L> Clone for AppState<F, L>
where
    F: FileLoader + ?Sized,
    L: LlmClient + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            chat_service: Arc::clone(&self.chat_service),
            typing_renderer: self.typing_renderer,
            default_format: self.default_format,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
