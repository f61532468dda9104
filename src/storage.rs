//! Snapshot persistence for the department collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::Department;

/// Persistence strategy for the full department collection.
///
/// The store writes the whole collection back through this trait after every
/// mutation; partial writes are not part of the contract.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Load the persisted collection. An empty backing store loads as an empty list.
    async fn load(&self) -> Result<Vec<Department>>;

    /// Persist the full collection.
    async fn save(&self, departments: &[Department]) -> Result<()>;
}

/// In-memory snapshot repository.
#[derive(Default)]
pub struct MemoryRepository {
    data: Mutex<Vec<Department>>,
}

impl MemoryRepository {
    /// Create an empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with the given collection.
    pub fn with_data(departments: Vec<Department>) -> Self {
        Self {
            data: Mutex::new(departments),
        }
    }
}

#[async_trait]
impl SnapshotRepository for MemoryRepository {
    async fn load(&self) -> Result<Vec<Department>> {
        Ok(self.data.lock().await.clone())
    }

    async fn save(&self, departments: &[Department]) -> Result<()> {
        *self.data.lock().await = departments.to_vec();
        Ok(())
    }
}

/// JSON file snapshot repository.
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    /// Create a repository backed by the given JSON file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotRepository for FileRepository {
    async fn load(&self) -> Result<Vec<Department>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // First run: nothing persisted yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Snapshot file {:?} not found, starting empty", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map_err(|e| AppError::parse(format!("Snapshot file {:?}: {e}", self.path)))
    }

    async fn save(&self, departments: &[Department]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(departments)
            .map_err(|e| AppError::parse(format!("Snapshot serialization: {e}")))?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved {} departments to {:?}", departments.len(), self.path);
        Ok(())
    }
}
