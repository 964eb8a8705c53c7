//! Snapshot file backing the CLI and the server

use anyhow::{Context, Result};
use mentor_kg::{GraphSnapshot, MemoryGraphStore, Mentor, MentorConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Location of the concept graph on disk
#[derive(Debug, Clone)]
pub struct GraphFile {
    path: PathBuf,
}

impl GraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/mentor/graph.yaml`, or `./graph.yaml` if there is no config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("mentor").join("graph.yaml"))
            .unwrap_or_else(|| PathBuf::from("graph.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty graph. Returns false if the file exists and `force` is off.
    pub fn init(&self, force: bool) -> Result<bool> {
        if self.path.exists() && !force {
            return Ok(false);
        }
        GraphSnapshot::default()
            .save(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Initialized empty graph at {}", self.path.display());
        Ok(true)
    }

    /// Load the graph (empty if the file is missing) into a fresh tutor
    pub fn open(&self, config: MentorConfig) -> Result<Mentor<MemoryGraphStore>> {
        let snapshot = GraphSnapshot::load_or_default(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        debug!(
            "Read {} concepts and {} edges from {}",
            snapshot.concepts.len(),
            snapshot.edges.len(),
            self.path.display()
        );

        let store = MemoryGraphStore::from_snapshot(snapshot)
            .with_context(|| format!("Invalid graph in {}", self.path.display()))?;
        Ok(Mentor::new(store, config)?)
    }

    /// Write the current store contents back to the file
    pub async fn save(&self, mentor: &Mentor<MemoryGraphStore>) -> Result<()> {
        let snapshot = mentor.store().to_snapshot().await;
        snapshot
            .save(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("Saved graph to {}", self.path.display());
        Ok(())
    }
}
