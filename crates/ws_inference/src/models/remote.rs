use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use ws_core::{ChatModel, ChatRequest, Error, Result};

/// Talks to a hosted `/api/chat` endpoint instead of the model provider,
/// the way the browser client does. The server owns the credential.
pub struct RemoteChatModel {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteChatModel {
    /// `base_url` is the service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::Validation("remote chat model needs a service URL".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            endpoint: format!("{}/api/chat", base_url),
        })
    }
}

impl fmt::Debug for RemoteChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteChatModel")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl ChatModel for RemoteChatModel {
    fn name(&self) -> &str {
        "Remote"
    }

    async fn generate(&self, request: &ChatRequest) -> Result<String> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| Error::ChatService(format!("Malformed chat reply (HTTP {}): {}", status, e)))?;

        match reply {
            ChatReply { text: Some(text), .. } if status.is_success() && !text.is_empty() => Ok(text),
            ChatReply { error: Some(error), .. } if !error.is_empty() => Err(Error::ChatService(error)),
            _ => Err(Error::ChatService(String::new())),
        }
    }
}
