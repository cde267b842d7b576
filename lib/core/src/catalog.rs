//! The read-only skill catalog seam. The persistent store behind it is an
//! external collaborator; the engine only consumes the active-skill list
//! during refresh, never on the query path.

use crate::Skill;
use thiserror::Error;

/// Catalog failure modes. Transient errors are retryable by the caller;
/// connectivity errors are fatal to the refresh call. Both abort the
/// refresh and leave the previously published snapshot live.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("transient catalog error: {0}")]
    Transient(String),

    #[error("catalog connectivity error: {0}")]
    Connectivity(String),
}

/// Read-only source of active skills
pub trait SkillCatalog: Send + Sync {
    fn fetch_active_skills(&self) -> std::result::Result<Vec<Skill>, CatalogError>;
}

/// In-memory catalog for tests and embedded use
pub struct StaticCatalog {
    skills: Vec<Skill>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }
}

impl SkillCatalog for StaticCatalog {
    fn fetch_active_skills(&self) -> std::result::Result<Vec<Skill>, CatalogError> {
        // Rows with empty names are dropped the way the relational source
        // filters null/blank skill names.
        Ok(self
            .skills
            .iter()
            .filter(|s| !s.name.trim().is_empty())
            .cloned()
            .collect())
    }
}
