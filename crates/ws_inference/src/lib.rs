pub mod bridge;
pub mod models;
pub mod prompt;
pub mod session;

pub use bridge::ConversationBridge;
pub use models::{create_model, ModelKind};
pub use session::ChatSession;

#[derive(Clone, Default)]
pub struct Config {
    pub kind: ModelKind,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    /// Gemini base URL override, or the service root for the remote model
    pub model_url: Option<String>,
}

impl Config {
    /// Credentials and model name come from `GEMINI_API_KEY` and `GEMINI_MODEL`.
    pub fn from_env(kind: ModelKind, model_url: Option<String>) -> Self {
        Self {
            kind,
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            model_name: std::env::var("GEMINI_MODEL").ok().filter(|m| !m.is_empty()),
            model_url,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::bridge::ConversationBridge;
    pub use super::models::create_model;
    pub use super::session::ChatSession;
    pub use super::Config;
    pub use ws_core::{ChatModel, ChatRequest, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config {
            api_key: Some("sekrit".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sekrit"));
        assert!(debug.contains("<redacted>"));
    }
}
