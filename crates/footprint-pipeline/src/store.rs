//! The persisted feature collection: existence gate, atomic write, read-back.

use std::path::{Path, PathBuf};

use footprint_core::FeatureCollection;

use crate::error::StoreError;

/// The single geodata artifact on disk.
#[derive(Debug, Clone)]
pub struct OutputStore {
    path: PathBuf,
}

impl OutputStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the artifact is present. Not atomic with respect to [`write`](Self::write).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `collection` as pretty JSON to a sibling temp file, then renames
    /// it into place. Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failures or
    /// [`StoreError::Serialize`] if the collection cannot be encoded.
    pub async fn write(&self, collection: &FeatureCollection) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| io_err(parent, source))?;
        }

        let json = serde_json::to_vec_pretty(collection).map_err(StoreError::Serialize)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| io_err(&tmp, source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| io_err(&self.path, source))?;

        tracing::info!(
            path = %self.path.display(),
            features = collection.len(),
            "geodata written"
        );
        Ok(())
    }

    /// Reads the artifact as raw JSON, exactly as stored.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Missing`] if the file does not exist.
    /// - [`StoreError::Malformed`] if it is not valid JSON.
    /// - [`StoreError::Io`] on any other read failure.
    pub async fn read(&self) -> Result<serde_json::Value, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(source) => return Err(io_err(&self.path, source)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use footprint_core::{Feature, Geometry, Properties};

    use super::*;

    fn temp_store() -> (PathBuf, OutputStore) {
        let dir = std::env::temp_dir().join(format!("footprint-store-{}", uuid::Uuid::new_v4()));
        let store = OutputStore::new(dir.join("out").join("geodata.json"));
        (dir, store)
    }

    fn collection() -> FeatureCollection {
        std::iter::once(Feature::new(
            Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]),
            Properties {
                company_name: Some("Acme".to_string()),
                ..Properties::default()
            },
        ))
        .collect()
    }

    #[tokio::test]
    async fn write_creates_parents_and_reads_back_verbatim() {
        let (dir, store) = temp_store();
        assert!(!store.exists());

        store.write(&collection()).await.unwrap();
        assert!(store.exists());
        assert!(!store.tmp_path().exists(), "temp file is renamed away");

        let json = store.read().await.unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["properties"]["company_name"], "Acme");
        assert!(json["features"][0]["properties"]["address"].is_null());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn read_missing_file_is_missing() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.read().await, Err(StoreError::Missing(_))));
    }

    #[tokio::test]
    async fn read_invalid_json_is_malformed() {
        let (dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.read().await,
            Err(StoreError::Malformed { .. })
        ));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn empty_collection_is_written() {
        let (dir, store) = temp_store();
        store.write(&FeatureCollection::new()).await.unwrap();
        let json = store.read().await.unwrap();
        assert_eq!(json["features"], serde_json::json!([]));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
