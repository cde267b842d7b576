//! # skillmatch Core
//!
//! Core library for the skillmatch hybrid suggestion engine.
//!
//! This crate provides the matching primitives and their concurrency
//! discipline:
//!
//! - [`normalizer`] - role text canonicalization (case-fold, noise-word
//!   removal) into the matching key
//! - [`Vector`] / [`IndexSnapshot`] / [`VectorIndex`] - unit-norm skill
//!   embeddings with brute-force top-k cosine search behind an atomically
//!   replaceable snapshot reference
//! - [`MappingSnapshot`] / [`RoleMapper`] - curated role → skills lookup
//!   with exact and fuzzy matching, published with the same snapshot-swap
//!   discipline
//! - [`suggest`] - the hybrid combiner merging mapped and semantic results
//! - [`Embedder`] and [`SkillCatalog`] - the seams to the external
//!   embedding provider and skill catalog
//!
//! ## Example
//!
//! ```rust
//! use skillmatch_core::{
//!     embed_skills, suggest, DamerauLevenshtein, Embedder, HashEmbedder,
//!     IndexSnapshot, RoleMapper, Skill, SuggestOptions, VectorIndex,
//! };
//!
//! let embedder = HashEmbedder::new(384);
//! let skills = vec![Skill::new(1, "Python"), Skill::new(2, "Rust")];
//! let vectors = embed_skills(&embedder, &skills).unwrap();
//! let snapshot = IndexSnapshot::build(384, embedder.version(), &skills, vectors).unwrap();
//!
//! let index = VectorIndex::new();
//! index.replace(snapshot);
//! let mapper = RoleMapper::new();
//!
//! let outcome = suggest(
//!     &index,
//!     &mapper,
//!     &embedder,
//!     &DamerauLevenshtein,
//!     "Senior Python Developer",
//!     &SuggestOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(outcome.normalized_role, "python");
//! ```

pub mod catalog;
pub mod config;
pub mod embed;
pub mod error;
pub mod index;
pub mod mapper;
pub mod normalizer;
pub mod similarity;
pub mod skill;
pub mod suggest;
pub mod vector;

pub use catalog::{CatalogError, SkillCatalog, StaticCatalog};
pub use config::{SuggestOptions, MAPPED_CONFIDENCE, MAX_LIMIT, MAX_ROLE_LEN};
pub use embed::{embed_skills, Embedder, HashEmbedder};
pub use error::{Error, Result};
pub use index::{IndexSnapshot, VectorIndex};
pub use mapper::{resolve_skill_names, MappingSnapshot, RoleMapper, RoleMapping};
pub use normalizer::{normalize_role, normalize_text};
pub use similarity::{DamerauLevenshtein, JaroWinkler, StringSimilarity};
pub use skill::{SearchMethod, Skill, SkillVector, Source, Suggestion};
pub use suggest::{suggest, SuggestOutcome};
pub use vector::Vector;
