mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    ChatSettings, DEFAULT_GREETING, LlmProvider, LlmSettings, LoggingSettings, ServerSettings,
    Settings,
};
