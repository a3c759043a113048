use std::fmt;
use ws_core::{ChatModel, ChatRequest, Result};

/// Offline stand-in that answers from the grounding context alone.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChatModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, request: &ChatRequest) -> Result<String> {
        // First 20 words of the context, or an admission of ignorance
        let words: Vec<&str> = request.context.split_whitespace().take(20).collect();
        if words.is_empty() {
            return Ok(format!(
                "I don't have any notes on \"{}\", so I can't answer \"{}\" with confidence.",
                request.topic, request.prompt
            ));
        }
        Ok(format!("About \"{}\": {}", request.topic, words.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();

        let request = ChatRequest {
            prompt: "What is it?".to_string(),
            topic: "Test".to_string(),
            context: "This is a test article. It has multiple sentences.".to_string(),
            history: vec![],
        };
        let reply = model.generate(&request).await.unwrap();
        assert_eq!(reply, "About \"Test\": This is a test article. It has multiple sentences.");

        let request = ChatRequest { context: String::new(), ..request };
        let reply = model.generate(&request).await.unwrap();
        assert!(reply.contains("with confidence"));
    }
}
