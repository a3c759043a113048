use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use ws_core::{Error, Result};

use crate::Config;

pub mod dummy;
pub mod gemini;
pub mod remote;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;
pub use remote::RemoteChatModel;
pub use ws_core::ChatModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Gemini,
    Remote,
    Dummy,
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "remote" => Ok(Self::Remote),
            "dummy" => Ok(Self::Dummy),
            other => Err(Error::Validation(format!(
                "Unknown model: {} (available: gemini, remote, dummy)",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::Remote => "remote",
            Self::Dummy => "dummy",
        })
    }
}

pub fn create_model(config: &Config) -> Result<Arc<dyn ChatModel>> {
    let model: Arc<dyn ChatModel> = match config.kind {
        ModelKind::Gemini => {
            let mut model = GeminiModel::new(config.api_key.clone(), config.model_name.clone())?;
            if let Some(url) = &config.model_url {
                model = model.with_base_url(url.clone());
            }
            Arc::new(model)
        }
        ModelKind::Remote => {
            let url = config
                .model_url
                .as_deref()
                .ok_or_else(|| Error::Validation("--model-url is required for the remote model".to_string()))?;
            Arc::new(RemoteChatModel::new(url)?)
        }
        ModelKind::Dummy => Arc::new(DummyModel::new()),
    };
    tracing::info!("🧠 Chat model initialized (using {})", model.name());
    Ok(model)
}
