use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use ws_core::{Error, KeyValueStore, Result};

pub mod backends;
pub mod bookmarks;
pub mod cli;

pub use backends::*;
pub use bookmarks::{BookmarkStore, BOOKMARKS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    Memory,
    #[default]
    File,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::Validation(format!(
                "Unknown storage backend: {} (expected memory, file or sqlite)",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// Build a backend. `location` is the directory for file storage; sqlite
/// keeps `bookmarks.db` inside it. Memory ignores it.
pub async fn create_store(kind: StorageKind, location: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match kind {
        StorageKind::Memory => Arc::new(MemoryStore::new()),
        StorageKind::File => Arc::new(FileStore::new_with_path(location).await?),
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => Arc::new(SqliteStore::new_with_path(&location.join("bookmarks.db")).await?),
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => {
            return Err(Error::Storage(
                "sqlite storage requires building with the `sqlite` feature".to_string(),
            ))
        }
    };
    tracing::info!("💾 Storage backend ready (using {})", store.kind());
    Ok(store)
}

pub mod prelude {
    pub use super::bookmarks::BookmarkStore;
    pub use super::backends::*;
    pub use super::{create_store, StorageKind};
}
