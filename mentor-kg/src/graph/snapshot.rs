//! Snapshot files for the in-memory store
//!
//! Format is picked from the extension: `.json` is JSON, anything else
//! (`.yaml`, `.yml`, none) is YAML.

use crate::error::Result;
use crate::graph::types::{Concept, Edge};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serializable copy of every concept and edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Yaml,
        }
    }
}

impl GraphSnapshot {
    /// Read a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let snapshot: GraphSnapshot = match SnapshotFormat::for_path(path) {
            SnapshotFormat::Json => serde_json::from_str(&content)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(&content)?,
        };
        Ok(snapshot)
    }

    /// Write the snapshot, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = match SnapshotFormat::for_path(path) {
            SnapshotFormat::Json => serde_json::to_string_pretty(self)?,
            SnapshotFormat::Yaml => serde_yaml::to_string(self)?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise start empty
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> GraphSnapshot {
        GraphSnapshot {
            concepts: vec![
                Concept::new("kv-cache", "KV Cache", "Reuse past keys/values"),
                Concept::new("attention", "Attention", "Weighted mixing of values"),
            ],
            edges: vec![Edge::prerequisite("kv-cache", "attention")],
        }
    }

    #[test]
    fn test_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("graph.yaml");

        let snapshot = sample();
        snapshot.save(&path).unwrap();
        let loaded = GraphSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");

        let snapshot = sample();
        snapshot.save(&path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.trim_start().starts_with('{'));
        assert_eq!(GraphSnapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_hand_written_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.yml");
        fs::write(
            &path,
            "concepts:\n  - id: attention\n    title: Attention\n    summary: QKV\nedges: []\n",
        )
        .unwrap();

        let loaded = GraphSnapshot::load(&path).unwrap();
        assert_eq!(loaded.concepts.len(), 1);
        assert_eq!(loaded.concepts[0].notes, "");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let loaded = GraphSnapshot::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert!(loaded.concepts.is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(GraphSnapshot::load(&path).is_err());
    }
}
