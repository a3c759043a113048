use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use ws_core::{Error, KeyValueStore, Result};

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn new_with_path(dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            Error::Storage(format!("Failed to create storage directory {}: {}", dir.display(), e))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(Error::Validation(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!("Failed to read {}: {}", path.display(), e))),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // write-then-rename
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to replace {}: {}", path.display(), e)))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!("Failed to remove {}: {}", path.display(), e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("nested").join("store");

        let store = FileStore::new_with_path(&dir).await.unwrap();
        assert_eq!(store.load("bookmarks").await.unwrap(), None);
        store.save("bookmarks", "[1,2,3]").await.unwrap();

        let reopened = FileStore::new_with_path(&dir).await.unwrap();
        assert_eq!(reopened.load("bookmarks").await.unwrap().as_deref(), Some("[1,2,3]"));
        assert!(!dir.join("bookmarks.json.tmp").exists());

        reopened.remove("bookmarks").await.unwrap();
        reopened.remove("bookmarks").await.unwrap();
        assert_eq!(reopened.load("bookmarks").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_like_keys() {
        let temp_dir = tempdir().unwrap();
        let store = FileStore::new_with_path(temp_dir.path()).await.unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.save(key, "x").await, Err(Error::Validation(_))), "{}", key);
        }
    }
}
