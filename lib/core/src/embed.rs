//! The embedding provider seam. The engine only needs a deterministic map
//! from text to a fixed-dimension unit vector; fine-tuning happens offline
//! and is visible here only through `version()`.

use crate::{normalizer, Result, Skill, SkillVector, Vector};
use rayon::prelude::*;
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

/// Maps text to a unit vector of a fixed dimension.
///
/// `embed` must be deterministic for a fixed `version()`; a version change
/// invalidates every cached vector built with the previous one.
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;
    fn version(&self) -> &str;
    fn embed(&self, text: &str) -> Result<Vector>;
}

/// Fixed seeds for deterministic hashing. Changing either changes every
/// embedding, so `version()` must be bumped with them.
const HASH_SEED_K0: u64 = 0x7c3a_9d42_51e8_b06f;
const HASH_SEED_K1: u64 = 0x2b91_e47d_8ca5_f130;

/// Feature-hashing embedder: tokens are hashed into a fixed number of
/// buckets with a sign hash, then the vector is L2-normalized.
///
/// Training-free and fully deterministic, which makes it the reference
/// provider for tests and for deployments without a learned model. Empty
/// input yields the degenerate zero vector, which scores (near) zero
/// against everything instead of failing.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        hasher.finish()
    }
}

impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn version(&self) -> &str {
        "hash-v1"
    }

    fn embed(&self, text: &str) -> Result<Vector> {
        let mut data = vec![0.0f32; self.dimension];

        for token in normalizer::normalize_text(text).split_whitespace() {
            let hashed = self.hash_token(token);
            let idx = (hashed as usize) % self.dimension;
            // Sign hashing: the top bit decides +1/-1 so collisions tend
            // to cancel rather than accumulate.
            let sign = if hashed >> 63 == 0 { 1.0 } else { -1.0 };
            data[idx] += sign;
        }

        let mut vector = Vector::new(data);
        vector.normalize();
        Ok(vector)
    }
}

/// Embed every skill name in parallel, preserving input order.
/// Skill names go through the same text normalization as queries.
pub fn embed_skills(embedder: &(dyn Embedder), skills: &[Skill]) -> Result<Vec<SkillVector>> {
    skills
        .par_iter()
        .map(|skill| {
            let vector = embedder.embed(&skill.name)?;
            Ok(SkillVector {
                skill_id: skill.id,
                vector,
            })
        })
        .collect()
}
