use crate::Vector;
use serde::{Deserialize, Serialize};

/// A catalog skill: the persistent store's primary key plus display name.
/// Immutable once fetched for a given snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
    pub id: i64,
    pub name: String,
}

impl Skill {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A skill's unit-norm embedding, keyed by catalog id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillVector {
    pub skill_id: i64,
    pub vector: Vector,
}

/// Which retrieval strategy produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Reached via the curated role → skills table
    Mapped,
    /// Reached via nearest-neighbor vector search
    Semantic,
}

/// How a whole result set was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Mapped,
    Semantic,
    Hybrid,
}

/// One suggested skill with its confidence and attribution.
/// Transient: produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub skill_id: i64,
    pub skill_name: String,
    pub confidence: f32,
    pub source: Source,
}
