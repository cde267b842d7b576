//! The service object owning the engine's two snapshot cells and the
//! refresh coordinator. Queries read whichever snapshots are currently
//! published; refresh and mapping edits build replacements off the query
//! path and publish them atomically, so neither side ever blocks the
//! other.

use crate::mappings::MappingStore;
use crate::vectors::{StoredSkillVector, StoredVectors, VectorStore};
use parking_lot::Mutex;
use serde::Serialize;
use skillmatch_core::{
    embed_skills, suggest, DamerauLevenshtein, Embedder, Error, IndexSnapshot, MappingSnapshot,
    Result, RoleMapper, RoleMapping, Skill, SkillCatalog, SkillVector, StringSimilarity,
    SuggestOptions, SuggestOutcome, Vector, VectorIndex, MAX_ROLE_LEN,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Cancellation is checked between embedding batches of this size.
const EMBED_BATCH: usize = 256;

/// Configuration for a [`SkillService`]
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the durable vector snapshot
    pub data_dir: PathBuf,
    /// Path of the role → skills mapping file
    pub mapping_file: PathBuf,
    /// Embedding dimension the index expects
    pub dimension: usize,
}

impl ServiceConfig {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let mapping_file = data_dir.join("role_skills.csv");
        Self {
            data_dir,
            mapping_file,
            dimension: 384,
        }
    }
}

/// Health probe payload
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub skills_indexed: usize,
    pub vectors_loaded: bool,
    pub model_loaded: bool,
}

/// Outcome of a completed refresh
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub skills_indexed: usize,
    pub duration: Duration,
}

/// Owns the vector index and role mapper snapshot cells plus their
/// durable stores. One instance per process; no ambient singletons.
pub struct SkillService {
    index: VectorIndex,
    mapper: RoleMapper,
    embedder: Arc<dyn Embedder>,
    catalog: Arc<dyn SkillCatalog>,
    metric: Box<dyn StringSimilarity>,
    vector_store: VectorStore,
    mapping_store: MappingStore,
    /// Single-flight guard: a second refresh is rejected, never interleaved
    refresh_in_flight: AtomicBool,
    /// Serializes mapping reloads and edits (read-modify-write on the file)
    mapping_edit: Mutex<()>,
    /// Cooperative cancellation for in-flight refreshes on shutdown
    cancelled: AtomicBool,
    dimension: usize,
}

impl std::fmt::Debug for SkillService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillService")
            .field("dimension", &self.dimension)
            .field(
                "refresh_in_flight",
                &self.refresh_in_flight.load(Ordering::Relaxed),
            )
            .field("cancelled", &self.cancelled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SkillService {
    pub fn new(
        config: ServiceConfig,
        catalog: Arc<dyn SkillCatalog>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        if embedder.dimension() != config.dimension {
            return Err(Error::DimensionMismatch {
                expected: config.dimension,
                actual: embedder.dimension(),
            });
        }
        std::fs::create_dir_all(&config.data_dir)?;

        Ok(Self {
            index: VectorIndex::new(),
            mapper: RoleMapper::new(),
            embedder,
            catalog,
            metric: Box::new(DamerauLevenshtein),
            vector_store: VectorStore::new(&config.data_dir),
            mapping_store: MappingStore::new(&config.mapping_file),
            refresh_in_flight: AtomicBool::new(false),
            mapping_edit: Mutex::new(()),
            cancelled: AtomicBool::new(false),
            dimension: config.dimension,
        })
    }

    /// Swap in a different string-similarity strategy
    #[must_use]
    pub fn with_metric(mut self, metric: Box<dyn StringSimilarity>) -> Self {
        self.metric = metric;
        self
    }

    /// Load durable state for a fast restart: the vector snapshot (if it
    /// matches the current embedder version and dimension) and the mapping
    /// file. Returns whether the index came up ready.
    pub fn load_from_disk(&self) -> Result<bool> {
        let mut ready = false;

        match self.vector_store.load()? {
            Some(stored)
                if stored.embedder_version == self.embedder.version()
                    && stored.dimension == self.dimension =>
            {
                let skills: Vec<Skill> = stored
                    .skills
                    .iter()
                    .map(|s| Skill::new(s.skill_id, s.skill_name.clone()))
                    .collect();
                let vectors: Vec<SkillVector> = stored
                    .skills
                    .into_iter()
                    .map(|s| SkillVector {
                        skill_id: s.skill_id,
                        vector: Vector::new(s.vector),
                    })
                    .collect();
                let snapshot = IndexSnapshot::build(
                    self.dimension,
                    self.embedder.version(),
                    &skills,
                    vectors,
                )?;
                info!(skills = snapshot.len(), "loaded vector snapshot from disk");
                self.index.replace(snapshot);
                ready = true;
            }
            Some(stored) => {
                warn!(
                    stored_version = %stored.embedder_version,
                    current_version = %self.embedder.version(),
                    "durable vectors are stale; the next refresh will rebuild them"
                );
            }
            None => {}
        }

        // A missing or broken mapping file is non-critical: the engine
        // falls back to pure semantic search.
        if let Err(err) = self.reload_mappings() {
            warn!(error = %err, "role mappings unavailable");
        }

        Ok(ready)
    }

    /// Suggest skills for a free-text role against the currently
    /// published snapshots.
    pub fn suggest(&self, role: &str, opts: &SuggestOptions) -> Result<SuggestOutcome> {
        suggest(
            &self.index,
            &self.mapper,
            self.embedder.as_ref(),
            self.metric.as_ref(),
            role,
            opts,
        )
    }

    /// Rebuild the vector index from the catalog and publish it.
    ///
    /// Reuses durable vectors for unchanged skills unless `reembed` is set
    /// or the provider version changed. A failure anywhere leaves the
    /// published snapshot and the durable file untouched; a concurrent
    /// call is rejected with `RefreshBusy`.
    pub fn refresh(&self, reembed: bool) -> Result<RefreshOutcome> {
        if self.refresh_in_flight.swap(true, Ordering::Acquire) {
            return Err(Error::RefreshBusy("vector index"));
        }
        let result = self.refresh_inner(reembed);
        self.refresh_in_flight.store(false, Ordering::Release);
        result
    }

    fn refresh_inner(&self, reembed: bool) -> Result<RefreshOutcome> {
        let start = Instant::now();
        info!(reembed, "starting vector refresh");

        let skills = self
            .catalog
            .fetch_active_skills()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let mut cached: HashMap<i64, Vector> = HashMap::new();
        if !reembed {
            if let Some(stored) = self.vector_store.load()? {
                if stored.embedder_version == self.embedder.version()
                    && stored.dimension == self.dimension
                {
                    cached = stored
                        .skills
                        .into_iter()
                        .map(|s| (s.skill_id, Vector::new(s.vector)))
                        .collect();
                }
            }
        }

        let mut vectors: Vec<SkillVector> = Vec::with_capacity(skills.len());
        for chunk in skills.chunks(EMBED_BATCH) {
            if self.cancelled.load(Ordering::Acquire) {
                return Err(Error::Cancelled);
            }

            let misses: Vec<Skill> = chunk
                .iter()
                .filter(|s| !cached.contains_key(&s.id))
                .cloned()
                .collect();
            let fresh = embed_skills(self.embedder.as_ref(), &misses)?;
            let mut fresh_by_id: HashMap<i64, Vector> =
                fresh.into_iter().map(|sv| (sv.skill_id, sv.vector)).collect();

            for skill in chunk {
                let vector = match cached.remove(&skill.id) {
                    Some(vector) => vector,
                    None => match fresh_by_id.remove(&skill.id) {
                        Some(vector) => vector,
                        // Duplicate catalog id within one chunk
                        None => self.embedder.embed(&skill.name)?,
                    },
                };
                vectors.push(SkillVector {
                    skill_id: skill.id,
                    vector,
                });
            }
        }

        let stored = StoredVectors {
            embedder_version: self.embedder.version().to_string(),
            dimension: self.dimension,
            skills: skills
                .iter()
                .zip(&vectors)
                .map(|(skill, sv)| StoredSkillVector {
                    skill_id: skill.id,
                    skill_name: skill.name.clone(),
                    vector: sv.vector.as_slice().to_vec(),
                })
                .collect(),
        };

        let snapshot =
            IndexSnapshot::build(self.dimension, self.embedder.version(), &skills, vectors)?;
        let skills_indexed = snapshot.len();

        // Persist first, then publish: a crash between the two leaves the
        // published state one refresh behind the durable state, which the
        // next startup reconciles.
        self.vector_store.save(&stored)?;
        self.index.replace(snapshot);

        let duration = start.elapsed();
        info!(skills_indexed, ?duration, "vector refresh complete");
        Ok(RefreshOutcome {
            skills_indexed,
            duration,
        })
    }

    /// Rebuild the role-mapping snapshot from the mapping file and publish
    /// it. Concurrent reloads and edits are serialized, never interleaved.
    pub fn reload_mappings(&self) -> Result<usize> {
        let _guard = self.mapping_edit.lock();
        let records = if self.mapping_store.exists() {
            self.mapping_store.load()?
        } else {
            Vec::new()
        };
        Ok(self.publish_mappings(records))
    }

    fn publish_mappings(&self, records: Vec<(String, Vec<String>)>) -> usize {
        let snapshot = MappingSnapshot::build(records);
        let count = snapshot.len();
        self.mapper.replace(snapshot);
        info!(mappings = count, "role mappings published");
        count
    }

    /// Add a new role mapping, persist it and republish the snapshot.
    pub fn add_mapping(&self, role: &str, skills: &[String]) -> Result<()> {
        let (role, skills) = validate_mapping(role, skills)?;

        let _guard = self.mapping_edit.lock();
        let mut records = self.load_records_locked()?;
        if records.iter().any(|(r, _)| r.eq_ignore_ascii_case(&role)) {
            return Err(Error::MappingExists(role));
        }
        records.push((role, skills));

        self.mapping_store.save(&records)?;
        self.publish_mappings(records);
        Ok(())
    }

    /// Update an existing role mapping in place.
    pub fn update_mapping(&self, original_role: &str, role: &str, skills: &[String]) -> Result<()> {
        let (role, skills) = validate_mapping(role, skills)?;

        let _guard = self.mapping_edit.lock();
        let mut records = self.load_records_locked()?;
        let position = records
            .iter()
            .position(|(r, _)| r.eq_ignore_ascii_case(original_role))
            .ok_or_else(|| Error::MappingNotFound(original_role.to_string()))?;

        let renamed = !role.eq_ignore_ascii_case(original_role);
        if renamed
            && records
                .iter()
                .enumerate()
                .any(|(i, (r, _))| i != position && r.eq_ignore_ascii_case(&role))
        {
            return Err(Error::MappingExists(role));
        }
        records[position] = (role, skills);

        self.mapping_store.save(&records)?;
        self.publish_mappings(records);
        Ok(())
    }

    /// Delete a role mapping by its display role (case-insensitive).
    pub fn delete_mapping(&self, role: &str) -> Result<()> {
        let _guard = self.mapping_edit.lock();
        let mut records = self.load_records_locked()?;
        let before = records.len();
        records.retain(|(r, _)| !r.eq_ignore_ascii_case(role));
        if records.len() == before {
            return Err(Error::MappingNotFound(role.to_string()));
        }

        self.mapping_store.save(&records)?;
        self.publish_mappings(records);
        Ok(())
    }

    fn load_records_locked(&self) -> Result<Vec<(String, Vec<String>)>> {
        if self.mapping_store.exists() {
            self.mapping_store.load()
        } else {
            Ok(Vec::new())
        }
    }

    /// All currently published role mappings, sorted by matching key
    #[must_use]
    pub fn list_mappings(&self) -> Vec<RoleMapping> {
        self.mapper
            .snapshot()
            .map(|snapshot| snapshot.mappings().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn health(&self) -> Health {
        Health {
            skills_indexed: self.index.len(),
            vectors_loaded: self.index.is_ready(),
            // The embedder is constructed with the service and never
            // unloaded at runtime.
            model_loaded: true,
        }
    }

    #[must_use]
    pub fn mapping_count(&self) -> usize {
        self.mapper.len()
    }

    /// Request cooperative cancellation of any in-flight refresh. Queries
    /// already running complete against their captured snapshots.
    pub fn shutdown(&self) {
        self.cancelled.store(true, Ordering::Release);
        info!("shutdown requested; in-flight refreshes will cancel");
    }
}

fn validate_mapping(role: &str, skills: &[String]) -> Result<(String, Vec<String>)> {
    let role = role.trim().to_string();
    if role.is_empty() {
        return Err(Error::Validation("role must not be empty".to_string()));
    }
    if role.len() > MAX_ROLE_LEN {
        return Err(Error::Validation(format!(
            "role exceeds {MAX_ROLE_LEN} characters"
        )));
    }
    let skills: Vec<String> = skills
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return Err(Error::Validation(
            "mapping needs at least one skill".to_string(),
        ));
    }
    Ok((role, skills))
}
