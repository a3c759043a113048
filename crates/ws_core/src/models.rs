use async_trait::async_trait;
use std::fmt;

use crate::types::ChatRequest;
use crate::Result;

#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Produce the assistant's reply to `request.prompt`, primed with the
    /// request's topic, grounding context and prior turns.
    async fn generate(&self, request: &ChatRequest) -> Result<String>;
}
