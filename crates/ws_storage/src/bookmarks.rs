use std::sync::Arc;
use tokio::sync::RwLock;
use ws_core::{Article, BookmarkedArticle, KeyValueStore};

/// Key under which the whole bookmark list is persisted.
pub const BOOKMARKS_KEY: &str = "wisdomscroll_bookmarks";

/// The user's saved articles, newest first.
///
/// Loaded once from the backend and written back after every change. One
/// instance is built per session and shared by `Arc`; reads never touch the
/// backend. Persistence problems are logged and never reach callers: an
/// unreadable list starts empty, a failed save keeps the in-memory state.
pub struct BookmarkStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    bookmarks: RwLock<Vec<BookmarkedArticle>>,
}

impl BookmarkStore {
    pub async fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::load_key(backend, BOOKMARKS_KEY).await
    }

    pub async fn load_key(backend: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let bookmarks = match backend.load(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<BookmarkedArticle>>(&raw) {
                Ok(bookmarks) => {
                    tracing::info!("🔖 Loaded {} bookmarks from {} storage", bookmarks.len(), backend.kind());
                    bookmarks
                }
                Err(e) => {
                    tracing::warn!("Stored bookmarks are corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read bookmarks, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            backend,
            key: key.to_string(),
            bookmarks: RwLock::new(bookmarks),
        }
    }

    /// Snapshot, newest first
    pub async fn bookmarks(&self) -> Vec<BookmarkedArticle> {
        self.bookmarks.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.bookmarks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookmarks.read().await.is_empty()
    }

    pub async fn is_bookmarked(&self, id: u64) -> bool {
        self.bookmarks.read().await.iter().any(|b| b.id() == id)
    }

    pub async fn get(&self, id: u64) -> Option<BookmarkedArticle> {
        self.bookmarks.read().await.iter().find(|b| b.id() == id).cloned()
    }

    /// No-op when the article is already bookmarked.
    pub async fn add_bookmark(&self, article: &Article) {
        let mut bookmarks = self.bookmarks.write().await;
        if insert(&mut bookmarks, article) {
            self.persist(&bookmarks).await;
        }
    }

    pub async fn remove_bookmark(&self, id: u64) {
        let mut bookmarks = self.bookmarks.write().await;
        if remove(&mut bookmarks, id) {
            self.persist(&bookmarks).await;
        }
    }

    /// Returns whether the article is bookmarked afterwards.
    pub async fn toggle_bookmark(&self, article: &Article) -> bool {
        let mut bookmarks = self.bookmarks.write().await;
        let now_bookmarked = if remove(&mut bookmarks, article.id) {
            false
        } else {
            insert(&mut bookmarks, article)
        };
        self.persist(&bookmarks).await;
        now_bookmarked
    }

    pub async fn clear_all_bookmarks(&self) {
        let mut bookmarks = self.bookmarks.write().await;
        bookmarks.clear();
        self.persist(&bookmarks).await;
    }

    // Called with the write guard held so saves land in mutation order.
    async fn persist(&self, bookmarks: &[BookmarkedArticle]) {
        let raw = match serde_json::to_string(bookmarks) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to encode bookmarks: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.save(&self.key, &raw).await {
            tracing::error!("Failed to save bookmarks to {} storage: {}", self.backend.kind(), e);
        }
    }
}

fn insert(bookmarks: &mut Vec<BookmarkedArticle>, article: &Article) -> bool {
    if bookmarks.iter().any(|b| b.id() == article.id) {
        return false;
    }
    bookmarks.insert(0, BookmarkedArticle::new(article.clone()));
    true
}

fn remove(bookmarks: &mut Vec<BookmarkedArticle>, id: u64) -> bool {
    let before = bookmarks.len();
    bookmarks.retain(|b| b.id() != id);
    bookmarks.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use async_trait::async_trait;
    use ws_core::{Error, Result};

    fn article(id: u64) -> Article {
        Article {
            id,
            title: format!("Article {}", id),
            extract: "An extract long enough to be worth reading about.".to_string(),
            thumbnail: None,
            page_image: None,
            url: format!("https://en.wikipedia.org/?curid={}", id),
        }
    }

    /// Backend whose reads and writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        fn kind(&self) -> &'static str {
            "broken"
        }

        async fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("disk on fire".to_string()))
        }

        async fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("disk on fire".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Storage("disk on fire".to_string()))
        }
    }

    async fn ids(store: &BookmarkStore) -> Vec<u64> {
        store.bookmarks().await.iter().map(|b| b.id()).collect()
    }

    #[tokio::test]
    async fn test_add_is_idempotent_and_newest_first() {
        let store = BookmarkStore::load(Arc::new(MemoryStore::new())).await;

        store.add_bookmark(&article(1)).await;
        store.add_bookmark(&article(2)).await;
        store.add_bookmark(&article(1)).await;

        assert_eq!(ids(&store).await, vec![2, 1]);
        assert!(store.is_bookmarked(1).await);
        assert!(!store.is_bookmarked(3).await);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_prior_state() {
        let store = BookmarkStore::load(Arc::new(MemoryStore::new())).await;
        store.add_bookmark(&article(1)).await;
        let before = store.bookmarks().await;

        assert!(store.toggle_bookmark(&article(2)).await);
        assert!(!store.toggle_bookmark(&article(2)).await);
        assert_eq!(store.bookmarks().await, before);

        assert!(!store.toggle_bookmark(&article(1)).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = BookmarkStore::load(Arc::new(MemoryStore::new())).await;
        for id in 1..=3 {
            store.add_bookmark(&article(id)).await;
        }

        store.remove_bookmark(2).await;
        store.remove_bookmark(42).await;
        assert_eq!(ids(&store).await, vec![3, 1]);

        store.clear_all_bookmarks().await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_persisted_layout_and_reload() {
        let backend = Arc::new(MemoryStore::new());
        let store = BookmarkStore::load(backend.clone()).await;
        store.add_bookmark(&article(1)).await;
        store.add_bookmark(&article(2)).await;

        let raw = backend.load(BOOKMARKS_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["pageid"], 2);
        assert!(entries[0]["bookmarkedAt"].is_i64());

        let reloaded = BookmarkStore::load(backend).await;
        assert_eq!(ids(&reloaded).await, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_corrupt_data_starts_empty() {
        let backend = Arc::new(MemoryStore::with_entry(BOOKMARKS_KEY, "{not json"));
        let store = BookmarkStore::load(backend.clone()).await;
        assert!(store.is_empty().await);

        // first mutation overwrites the corrupt value
        store.add_bookmark(&article(9)).await;
        let reloaded = BookmarkStore::load(backend).await;
        assert_eq!(ids(&reloaded).await, vec![9]);
    }

    #[tokio::test]
    async fn test_broken_backend_never_escapes() {
        let store = BookmarkStore::load(Arc::new(BrokenStore)).await;
        assert!(store.is_empty().await);

        store.add_bookmark(&article(1)).await;
        assert!(store.is_bookmarked(1).await);
        store.clear_all_bookmarks().await;
        assert!(store.is_empty().await);
    }
}
