//! Type definitions for concept graph nodes and edges

use crate::error::{KgError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable, unique concept identifier (e.g. `kv-cache`)
pub type ConceptId = String;

/// How well the learner knows a concept
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum MasteryLevel {
    /// Never studied
    #[default]
    Unseen,
    /// Seen once, not yet practised
    Introduced,
    /// Being practised
    Practicing,
    /// Known well
    Mastered,
}

impl MasteryLevel {
    /// Ordinal value 0-3
    pub fn as_u8(&self) -> u8 {
        match self {
            MasteryLevel::Unseen => 0,
            MasteryLevel::Introduced => 1,
            MasteryLevel::Practicing => 2,
            MasteryLevel::Mastered => 3,
        }
    }

    /// Parse an ordinal value
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            0 => Some(MasteryLevel::Unseen),
            1 => Some(MasteryLevel::Introduced),
            2 => Some(MasteryLevel::Practicing),
            3 => Some(MasteryLevel::Mastered),
            _ => None,
        }
    }

    /// Convert level to display string
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Unseen => "unseen",
            MasteryLevel::Introduced => "introduced",
            MasteryLevel::Practicing => "practicing",
            MasteryLevel::Mastered => "mastered",
        }
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = KgError;

    fn try_from(level: u8) -> Result<Self> {
        MasteryLevel::from_u8(level)
            .ok_or_else(|| KgError::Validation(format!("mastery level {} is not in 0-3", level)))
    }
}

/// Kind of a directed edge between two concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Target must be understood before source
    Prerequisite,
    /// Target is a worked example of source
    Example,
    /// Loosely related, never traversed for context packs
    Related,
}

impl RelationKind {
    /// Convert kind to string for storage and keys
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Prerequisite => "prerequisite",
            RelationKind::Example => "example",
            RelationKind::Related => "related",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = KgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "prerequisite" | "prereq" => Ok(RelationKind::Prerequisite),
            "example" => Ok(RelationKind::Example),
            "related" => Ok(RelationKind::Related),
            other => Err(KgError::Validation(format!(
                "unknown relation kind: {}",
                other
            ))),
        }
    }
}

/// A single learnable unit in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Unique identifier for the concept
    pub id: ConceptId,
    /// Display title
    pub title: String,
    /// L0 summary: short canonical description
    pub summary: String,
    /// Learner's mastery of this concept
    #[serde(default)]
    pub mastery: MasteryLevel,
    /// Free-form learner notes
    #[serde(default)]
    pub notes: String,
    /// Timestamp when the concept was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Concept {
    /// Create a new, unseen concept
    pub fn new(id: impl Into<String>, title: impl Into<String>, summary: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            summary: summary.into(),
            mastery: MasteryLevel::Unseen,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the mastery level
    pub fn with_mastery(mut self, mastery: MasteryLevel) -> Self {
        self.mastery = mastery;
        self
    }

    /// Set learner notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Reject records the store cannot key or display
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(KgError::Validation("concept id must not be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(KgError::Validation(format!(
                "concept {} must have a title",
                self.id
            )));
        }
        Ok(())
    }
}

/// Partial update for a concept; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub mastery: Option<MasteryLevel>,
    pub notes: Option<String>,
}

impl ConceptPatch {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none() && self.mastery.is_none() && self.notes.is_none()
    }

    /// Apply the patch in place and bump `updated_at`
    pub fn apply(&self, concept: &mut Concept) {
        if let Some(title) = &self.title {
            concept.title = title.clone();
        }
        if let Some(summary) = &self.summary {
            concept.summary = summary.clone();
        }
        if let Some(mastery) = self.mastery {
            concept.mastery = mastery;
        }
        if let Some(notes) = &self.notes {
            concept.notes = notes.clone();
        }
        concept.updated_at = Utc::now();
    }
}

/// Directed, typed link between two concepts.
///
/// At most one edge exists per `(source, target, kind)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: ConceptId,
    pub target: ConceptId,
    pub kind: RelationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    /// Create an unweighted edge
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            weight: None,
        }
    }

    /// `target` is a prerequisite of `source`
    pub fn prerequisite(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, RelationKind::Prerequisite)
    }

    /// `target` is an example of `source`
    pub fn example(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, RelationKind::Example)
    }

    /// `target` is related to `source`
    pub fn related(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, RelationKind::Related)
    }

    /// Attach a weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Whether this edge has the given identity triple
    pub fn matches(&self, source: &str, target: &str, kind: RelationKind) -> bool {
        self.source == source && self.target == target && self.kind == kind
    }

    /// Human-readable identity, used in errors and logs
    pub fn describe(&self) -> String {
        format!("{} -[{}]-> {}", self.source, self.kind, self.target)
    }
}
