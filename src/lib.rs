//! # skillmatch
//!
//! A hybrid skill suggestion engine: given a free-text job role, it
//! recommends technical skills by combining a curated role → skills table
//! (exact and fuzzy lookup) with nearest-neighbor search over dense skill
//! embeddings.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install skillmatch
//! skillmatch --data-dir ./data --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use skillmatch::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ServiceConfig::new("./data");
//! let catalog = Arc::new(StaticCatalog::new(vec![
//!     Skill::new(1, "Python"),
//!     Skill::new(2, "Rust"),
//! ]));
//! let embedder = Arc::new(HashEmbedder::new(config.dimension));
//! let service = SkillService::new(config, catalog, embedder).unwrap();
//!
//! service.refresh(true).unwrap();
//! let outcome = service
//!     .suggest("Senior Python Developer", &SuggestOptions::default())
//!     .unwrap();
//! println!("{:?}", outcome.skills);
//! ```
//!
//! ## Crate Structure
//!
//! skillmatch is composed of several crates:
//!
//! - [`skillmatch-core`](https://docs.rs/skillmatch-core) - normalization,
//!   the vector index, fuzzy role mapping and the hybrid combiner
//! - [`skillmatch-storage`](https://docs.rs/skillmatch-storage) - durable
//!   snapshots, mapping files and the refresh coordinator
//! - [`skillmatch-api`](https://docs.rs/skillmatch-api) - the REST surface
//!
//! ## Concurrency
//!
//! The vector index and role mapper are immutable snapshots behind
//! atomically replaceable references. Queries capture a snapshot at call
//! start and never block on refreshes; refreshes build replacements off
//! the query path and publish them with a pointer swap.

// Re-export core types
pub use skillmatch_core::{
    embed_skills, normalize_role, normalize_text, suggest, CatalogError, DamerauLevenshtein,
    Embedder, Error, HashEmbedder, IndexSnapshot, JaroWinkler, MappingSnapshot, Result,
    RoleMapper, RoleMapping, SearchMethod, Skill, SkillCatalog, SkillVector, Source,
    StaticCatalog, StringSimilarity, SuggestOptions, SuggestOutcome, Suggestion, Vector,
    VectorIndex,
};

// Re-export storage
pub use skillmatch_storage::{
    FileCatalog, Health, MappingStore, RefreshOutcome, ServiceConfig, SkillService, VectorStore,
};

// Re-export API
pub use skillmatch_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogError, DamerauLevenshtein, Embedder, Error, FileCatalog, HashEmbedder, Health,
        IndexSnapshot, MappingSnapshot, RefreshOutcome, Result, RestApi, RoleMapper, RoleMapping,
        SearchMethod, ServiceConfig, Skill, SkillCatalog, SkillService, SkillVector, Source,
        StaticCatalog, StringSimilarity, SuggestOptions, SuggestOutcome, Suggestion, Vector,
        VectorIndex,
    };
}
