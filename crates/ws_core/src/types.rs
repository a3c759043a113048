use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// One encyclopedia page, normalized from whichever provider response it
/// came from. Field names on the wire follow the provider's query API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "pageid")]
    pub id: u64,
    pub title: String,
    pub extract: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(rename = "pageimage", default, skip_serializing_if = "Option::is_none")]
    pub page_image: Option<String>,
    #[serde(rename = "fullurl")]
    pub url: String,
}

impl Article {
    /// Whether the extract is strictly longer than `min_chars` characters.
    pub fn has_extract_longer_than(&self, min_chars: usize) -> bool {
        self.extract.chars().count() > min_chars
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(rename = "bookmarkedAt", with = "chrono::serde::ts_milliseconds")]
    pub bookmarked_at: DateTime<Utc>,
}

impl BookmarkedArticle {
    pub fn new(article: Article) -> Self {
        Self {
            article,
            bookmarked_at: Utc::now(),
        }
    }

    pub fn id(&self) -> u64 {
        self.article.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Anything that is not literally "assistant" is treated as the user.
    pub fn from_wire(role: &str) -> Self {
        if role == "assistant" {
            Role::Assistant
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A prior turn as sent to a chat model: just role and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Everything a chat model needs to answer one question about one topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article() -> Article {
        Article {
            id: 42,
            title: "Ada Lovelace".to_string(),
            extract: "English mathematician.".to_string(),
            thumbnail: None,
            page_image: None,
            url: "https://en.wikipedia.org/wiki/Ada_Lovelace".to_string(),
        }
    }

    #[test]
    fn test_article_uses_provider_field_names() {
        let json = serde_json::to_value(article()).unwrap();
        assert_eq!(json["pageid"], 42);
        assert_eq!(json["fullurl"], "https://en.wikipedia.org/wiki/Ada_Lovelace");
        assert!(json.get("thumbnail").is_none());
    }

    #[test]
    fn test_bookmarked_article_is_flat_with_millis() {
        let bookmarked = BookmarkedArticle {
            article: article(),
            bookmarked_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        };
        let json = serde_json::to_value(&bookmarked).unwrap();
        assert_eq!(json["pageid"], 42);
        assert_eq!(json["bookmarkedAt"], 1_700_000_000_123i64);

        let back: BookmarkedArticle = serde_json::from_value(json).unwrap();
        assert_eq!(back, bookmarked);
    }

    #[test]
    fn test_extract_length_counts_chars() {
        let mut a = article();
        a.extract = "é".repeat(50);
        assert!(!a.has_extract_longer_than(50));
        a.extract.push('é');
        assert!(a.has_extract_longer_than(50));
    }

    #[test]
    fn test_role_from_wire() {
        assert_eq!(Role::from_wire("assistant"), Role::Assistant);
        assert_eq!(Role::from_wire("model"), Role::User);
        assert_eq!(Role::from_wire(""), Role::User);
    }
}
