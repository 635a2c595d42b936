//! Candidate Store — the JSON document holding every candidate profile.
//!
//! Consistency contract: readers get an owned snapshot taken under a shared
//! lock; writers hold the exclusive lock across read-modify-write and replace
//! the file atomically (temp file + rename), so no reader ever observes a
//! partially applied mutation.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::candidate::{CandidateProfile, CandidateUpdate, NewCandidate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Candidate store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub struct CandidateStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl CandidateStore {
    /// Opens the store at `path`, creating an empty document (and parent
    /// directories) when none exists yet. An existing file is validated.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let store = Self {
            path,
            lock: RwLock::new(()),
        };

        if tokio::fs::try_exists(&store.path).await? {
            let existing = store.read_all().await?;
            info!(
                "Candidate store opened at {} ({} candidates)",
                store.path.display(),
                existing.len()
            );
        } else {
            store.write_all(&[]).await?;
            info!("Created empty candidate store at {}", store.path.display());
        }

        Ok(store)
    }

    /// Read-consistent copy of the current contents.
    pub async fn snapshot(&self) -> Result<Vec<CandidateProfile>, StoreError> {
        let _guard = self.lock.read().await;
        self.read_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<CandidateProfile>, StoreError> {
        Ok(self.snapshot().await?.into_iter().find(|c| c.id == id))
    }

    /// Appends a newly ingested profile and returns it with its assigned id.
    pub async fn append(&self, new: NewCandidate) -> Result<CandidateProfile, StoreError> {
        let _guard = self.lock.write().await;
        let mut candidates = self.read_all().await?;

        let mut id = Uuid::new_v4().to_string();
        while candidates.iter().any(|c| c.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let candidate = CandidateProfile::from_new(id, new, Utc::now());
        candidates.push(candidate.clone());
        self.write_all(&candidates).await?;

        info!("Stored candidate {} ({})", candidate.id, candidate.name);
        Ok(candidate)
    }

    /// Applies reviewer corrections. Returns `None` for an unknown id.
    pub async fn update(
        &self,
        id: &str,
        update: CandidateUpdate,
    ) -> Result<Option<CandidateProfile>, StoreError> {
        let _guard = self.lock.write().await;
        let mut candidates = self.read_all().await?;

        let Some(candidate) = candidates.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        candidate.apply_update(update);
        let updated = candidate.clone();

        self.write_all(&candidates).await?;
        Ok(Some(updated))
    }

    async fn read_all(&self) -> Result<Vec<CandidateProfile>, StoreError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_all(&self, candidates: &[CandidateProfile]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(candidates)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || persist_atomically(&path, &payload))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }
}

fn persist_atomically(path: &Path, payload: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_candidate(name: &str, skills: &[&str], years: f64) -> NewCandidate {
        NewCandidate {
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years: years,
            ..NewCandidate::default()
        }
    }

    #[tokio::test]
    async fn test_open_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("candidates.json");

        let store = CandidateStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert!(store.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_snapshot_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::open(dir.path().join("c.json")).await.unwrap();

        let first = store.append(new_candidate("Asha", &["Python"], 6.0)).await.unwrap();
        let second = store.append(new_candidate("Bo", &["Rust"], 2.0)).await.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, first.id);
        assert_eq!(snapshot[1].id, second.id);
        assert!(snapshot[0].uploaded_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_emails_are_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::open(dir.path().join("c.json")).await.unwrap();

        let a = store.append(new_candidate("Sam", &[], 1.0)).await.unwrap();
        let b = store.append(new_candidate("Sam", &[], 1.0)).await.unwrap();

        assert_eq!(a.email, b.email);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_changes_fields_but_not_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::open(dir.path().join("c.json")).await.unwrap();
        let created = store.append(new_candidate("Asha", &["Python"], 6.0)).await.unwrap();

        let updated = store
            .update(
                &created.id,
                CandidateUpdate {
                    location: Some("Bangalore".to_string()),
                    ..CandidateUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.location.as_deref(), Some("Bangalore"));
        let reloaded = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::open(dir.path().join("c.json")).await.unwrap();
        let result = store.update("missing", CandidateUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        let store = CandidateStore::open(&path).await.unwrap();

        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(store.snapshot().await, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_missing_file_after_open_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        let store = CandidateStore::open(&path).await.unwrap();

        std::fs::remove_file(&path).unwrap();

        assert!(matches!(store.snapshot().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_reads_sparse_legacy_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(
            &path,
            r#"[{"id": "20240101_120000", "name": "Old", "filename": "a.pdf",
                 "skills": ["SQL"], "experience_years": 4,
                 "uploaded_at": "2024-01-01T12:00:00Z"}]"#,
        )
        .unwrap();

        let store = CandidateStore::open(&path).await.unwrap();
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot[0].filename.as_deref(), Some("a.pdf"));
        assert_eq!(snapshot[0].experience_years, 4.0);
    }

    #[tokio::test]
    async fn test_opens_document_with_python_isoformat_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(
            &path,
            r#"[{"id":"20240101_120000","uploaded_at":"2024-01-01T12:00:00.123456","name":"Asha","skills":["Python"],"experience_years":4}]"#,
        )
        .unwrap();

        let store = CandidateStore::open(&path).await.unwrap();
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "Asha");
        assert!(snapshot[0].uploaded_at.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CandidateStore::open(dir.path().join("c.json")).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(new_candidate(&format!("C{i}"), &["Go"], i as f64))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 10);
        let ids: HashSet<_> = snapshot.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 10);
    }
}
