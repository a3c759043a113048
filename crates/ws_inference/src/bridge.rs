use std::fmt;
use std::sync::Arc;
use ws_core::{ChatModel, ChatRequest, Error, HistoryTurn};

use crate::prompt::truncate_history;

pub const FALLBACK_REPLY: &str = "Sorry, I could not get an answer right now.";
pub const NETWORK_FALLBACK_REPLY: &str = "Network error while contacting AI service.";

/// Stateless question/answer exchange with a chat model. Whatever happens,
/// `ask` hands back text to show as the assistant's message.
#[derive(Clone)]
pub struct ConversationBridge {
    model: Arc<dyn ChatModel>,
}

impl fmt::Debug for ConversationBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationBridge")
            .field("model", &self.model.name())
            .finish()
    }
}

impl ConversationBridge {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn ask(&self, prompt: &str, topic: &str, context: &str, prior: &[HistoryTurn]) -> String {
        let request = ChatRequest {
            prompt: prompt.to_string(),
            topic: topic.to_string(),
            context: context.to_string(),
            history: truncate_history(prior),
        };

        match self.model.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("{} returned an empty answer about {:?}", self.model.name(), topic);
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!("{} failed to answer about {:?}: {}", self.model.name(), topic, e);
                fallback_reply(&e)
            }
        }
    }
}

fn fallback_reply(error: &Error) -> String {
    match error {
        Error::ChatService(message) if !message.trim().is_empty() => message.clone(),
        Error::MissingCredential(_) => error.to_string(),
        e if e.is_transport() => NETWORK_FALLBACK_REPLY.to_string(),
        _ => FALLBACK_REPLY.to_string(),
    }
}
