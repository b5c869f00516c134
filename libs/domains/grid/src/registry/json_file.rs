use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::AssignmentRegistry;
use crate::error::{GridError, GridResult};
use crate::models::{to_keyed, AssignmentMap, Coordinate};
use crate::repository::AssignmentRepository;

/// Assignment repository persisted as a `{"x,y": "domain"}` JSON file.
///
/// Every successful `put` rewrites the full snapshot before returning. The
/// snapshot is written to a sibling temporary file, synced, then renamed over
/// the target so readers only ever see a complete file.
#[derive(Debug)]
pub struct JsonFileAssignmentRepository {
    path: PathBuf,
    registry: RwLock<AssignmentRegistry>,
}

impl JsonFileAssignmentRepository {
    /// Load the snapshot at `path`, starting empty when the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> GridResult<Self> {
        let path = path.into();

        let registry = match fs::read(&path).await {
            Ok(bytes) => {
                let keyed: BTreeMap<String, String> = serde_json::from_slice(&bytes)
                    .map_err(|e| {
                        GridError::Storage(format!("Failed to parse {}: {}", path.display(), e))
                    })?;
                AssignmentRegistry::from_keyed(keyed)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot found, starting with an empty grid");
                AssignmentRegistry::new()
            }
            Err(e) => {
                return Err(GridError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        info!(
            path = %path.display(),
            assignments = registry.len(),
            "Loaded coordinate snapshot"
        );

        Ok(Self {
            path,
            registry: RwLock::new(registry),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    async fn persist(&self, registry: &AssignmentRegistry) -> GridResult<()> {
        let storage = |action: &str, e: std::io::Error| {
            GridError::Storage(format!("Failed to {} {}: {}", action, self.path.display(), e))
        };

        let body = serde_json::to_vec(&to_keyed(&registry.snapshot()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage("create directory for", e))?;
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| storage("create temporary file for", e))?;
        file.write_all(&body)
            .await
            .map_err(|e| storage("write", e))?;
        file.sync_all().await.map_err(|e| storage("sync", e))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage("replace", e))?;

        debug!(path = %self.path.display(), bytes = body.len(), "Snapshot written");
        Ok(())
    }
}

#[async_trait]
impl AssignmentRepository for JsonFileAssignmentRepository {
    async fn get(&self, coord: Coordinate) -> GridResult<Option<String>> {
        let registry = self.registry.read().await;
        Ok(registry.get(&coord).cloned())
    }

    async fn put(&self, coord: Coordinate, domain: String) -> GridResult<()> {
        let mut registry = self.registry.write().await;
        registry.insert(coord, domain.clone())?;

        if let Err(e) = self.persist(&registry).await {
            registry.revert(&coord);
            warn!(%coord, %domain, error = %e, "Persisting assignment failed, rolled back");
            return Err(e);
        }

        info!(%coord, %domain, "Assigned coordinate");
        Ok(())
    }

    async fn nearest_assigned(&self, target: Coordinate) -> GridResult<Coordinate> {
        let registry = self.registry.read().await;
        registry.nearest(&target).ok_or(GridError::EmptyRegistry)
    }

    async fn assigned_domains(&self) -> GridResult<HashSet<String>> {
        let registry = self.registry.read().await;
        Ok(registry.assigned_domains())
    }

    async fn snapshot(&self) -> GridResult<AssignmentMap> {
        let registry = self.registry.read().await;
        Ok(registry.snapshot())
    }

    async fn count(&self) -> GridResult<usize> {
        let registry = self.registry.read().await;
        Ok(registry.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileAssignmentRepository::open(dir.path().join("map.json"))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(!repo.path().exists());
    }

    #[tokio::test]
    async fn test_put_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("map.json");

        let repo = JsonFileAssignmentRepository::open(&path).await.unwrap();
        repo.put(Coordinate::ORIGIN, "google.com".into()).await.unwrap();
        repo.put(Coordinate::new(0, 1), "youtube.com".into())
            .await
            .unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.get("0,0").map(String::as_str), Some("google.com"));
        assert_eq!(raw.get("0,1").map(String::as_str), Some("youtube.com"));

        let reloaded = JsonFileAssignmentRepository::open(&path).await.unwrap();
        assert_eq!(
            reloaded.snapshot().await.unwrap(),
            repo.snapshot().await.unwrap()
        );
        assert_eq!(
            reloaded.assigned_domains().await.unwrap(),
            repo.assigned_domains().await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_no_temporary_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.json");

        let repo = JsonFileAssignmentRepository::open(&path).await.unwrap();
        repo.put(Coordinate::ORIGIN, "a.com".into()).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("map.json")]);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        let repo = JsonFileAssignmentRepository::open(blocker.join("map.json"))
            .await
            .unwrap();

        // A regular file where the parent directory should be makes every write fail.
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = repo
            .put(Coordinate::ORIGIN, "a.com".into())
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::Storage(_)));

        assert!(repo.get(Coordinate::ORIGIN).await.unwrap().is_none());
        assert!(repo.assigned_domains().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_snapshots() {
        let dir = TempDir::new().unwrap();

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, b"[1, 2, 3]").unwrap();
        let err = JsonFileAssignmentRepository::open(&garbage)
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::Storage(_)));

        let duplicated = dir.path().join("duplicated.json");
        std::fs::write(&duplicated, br#"{"0,0": "a.com", "1,0": "a.com"}"#).unwrap();
        let err = JsonFileAssignmentRepository::open(&duplicated)
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::Storage(_)));
    }

    #[tokio::test]
    async fn test_open_accepts_spaced_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(&path, br#"{"3, -2": "a.com"}"#).unwrap();

        let repo = JsonFileAssignmentRepository::open(&path).await.unwrap();
        assert_eq!(
            repo.get(Coordinate::new(3, -2)).await.unwrap().as_deref(),
            Some("a.com")
        );
    }
}
