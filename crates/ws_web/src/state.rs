use std::sync::Arc;
use ws_core::{ArticleSource, ChatModel};

pub struct AppState {
    /// `None` when no credential was configured; chat requests then fail with 500.
    pub chat_model: Option<Arc<dyn ChatModel>>,
    pub source: Arc<dyn ArticleSource>,
}

impl AppState {
    pub fn new(chat_model: Option<Arc<dyn ChatModel>>, source: Arc<dyn ArticleSource>) -> Self {
        Self { chat_model, source }
    }
}
