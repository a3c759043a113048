use ws_core::{Article, ChatMessage, HistoryTurn};

use crate::bridge::ConversationBridge;

/// Transcript of one chat about one article. Lives exactly as long as the
/// chat overlay that owns it and is never persisted.
#[derive(Debug, Clone)]
pub struct ChatSession {
    article: Article,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn open(article: Article) -> Self {
        let greeting = ChatMessage::assistant(format!(
            "Hi! I'm here to help you explore \"{}\". What would you like to know about this topic?",
            article.title
        ));
        Self {
            article,
            messages: vec![greeting],
        }
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Post the user's text and wait for the assistant's answer. Blank
    /// input is ignored. Returns the assistant message that was appended.
    pub async fn send(&mut self, bridge: &ConversationBridge, input: &str) -> Option<&ChatMessage> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }

        // history is the transcript as it stood before this question
        let prior: Vec<HistoryTurn> = self.messages.iter().map(HistoryTurn::from).collect();
        self.messages.push(ChatMessage::user(prompt));

        let answer = bridge
            .ask(prompt, &self.article.title, &self.article.extract, &prior)
            .await;
        self.messages.push(ChatMessage::assistant(answer));
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;
    use std::sync::Arc;
    use ws_core::Role;

    fn article() -> Article {
        Article {
            id: 1,
            title: "Platypus".to_string(),
            extract: "The platypus is a semiaquatic, egg-laying mammal.".to_string(),
            thumbnail: None,
            page_image: None,
            url: "https://en.wikipedia.org/wiki/Platypus".to_string(),
        }
    }

    #[tokio::test]
    async fn test_session_flow() {
        let bridge = ConversationBridge::new(Arc::new(DummyModel::new()));
        let mut session = ChatSession::open(article());

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert!(session.messages()[0].content.contains("\"Platypus\""));

        assert!(session.send(&bridge, "   ").await.is_none());
        assert_eq!(session.messages().len(), 1);

        let reply = session.send(&bridge, " Does it lay eggs? ").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.contains("egg-laying"));

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Does it lay eggs?");
    }
}
