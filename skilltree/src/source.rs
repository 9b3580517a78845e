//! Data-access seam: where node/connection snapshots come from.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::SkillTreeSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read skill tree {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid skill tree json in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fetches one immutable snapshot per call. The engine never subscribes to updates.
pub trait SkillTreeSource {
    fn fetch(&self) -> Result<SkillTreeSnapshot, SourceError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SkillTreeSource for JsonFileSource {
    fn fetch(&self) -> Result<SkillTreeSnapshot, SourceError> {
        let bytes = fs::read(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: SkillTreeSnapshot =
            serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            connections = snapshot.connections.len(),
            "loaded skill tree"
        );
        Ok(snapshot)
    }
}

/// In-memory source, mostly for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub SkillTreeSnapshot);

impl SkillTreeSource for StaticSource {
    fn fetch(&self) -> Result<SkillTreeSnapshot, SourceError> {
        Ok(self.0.clone())
    }
}
