//! # skillmatch Storage
//!
//! Durable state and the service object for the skillmatch engine:
//!
//! - [`VectorStore`] - the bincode vector snapshot on disk, written with a
//!   temporary-file-then-rename discipline
//! - [`MappingStore`] - the role → skills mapping file
//! - [`FileCatalog`] - a file-backed stand-in for the relational skill
//!   catalog
//! - [`SkillService`] - owns the two snapshot cells, coordinates refresh
//!   and mapping edits, and answers queries and health probes

pub mod mappings;
pub mod service;
pub mod skills;
pub mod vectors;

pub use mappings::MappingStore;
pub use service::{Health, RefreshOutcome, ServiceConfig, SkillService};
pub use skills::FileCatalog;
pub use vectors::{StoredSkillVector, StoredVectors, VectorStore};
