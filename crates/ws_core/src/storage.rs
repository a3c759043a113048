use async_trait::async_trait;
use crate::Result;

/// A durable string-keyed store. Values are opaque strings; callers own
/// their encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name for logs
    fn kind(&self) -> &'static str;

    /// Returns `None` when nothing was ever saved under `key`
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key`
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
