use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{load_file, LoadError};
use super::model::Dataset;

/// The dataset for the lifetime of the process, plus the path it came from.
///
/// Created once at start-up. [`DatasetHandle::reload`] is the only way to
/// change it and swaps the whole dataset in one assignment.
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    path: PathBuf,
    dataset: Arc<Dataset>,
}

impl DatasetHandle {
    /// Load `path` and wrap the result.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let dataset = load_file(&path)?;
        Ok(Self {
            path,
            dataset: Arc::new(dataset),
        })
    }

    /// Wrap an already loaded dataset.
    #[cfg(test)]
    pub fn from_dataset(path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        Self {
            path: path.into(),
            dataset: Arc::new(dataset),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared, read-only dataset.
    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    /// Re-read the file. On failure the current dataset is kept.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let fresh = load_file(&self.path)?;
        self.dataset = Arc::new(fresh);
        Ok(())
    }
}
