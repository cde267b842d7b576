//! Curated role → skills lookup: exact match on the normalized key, fuzzy
//! fallback over all known keys, and fuzzy resolution of mapped skill
//! names against the catalog. The mapping table is published as an
//! immutable snapshot behind the same atomically replaceable reference
//! discipline as the vector index.

use crate::normalizer::{normalize_role, normalize_text};
use crate::similarity::StringSimilarity;
use crate::Skill;
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Score floor applied when one normalized role contains the other, e.g.
/// "mern stack" inside "mern stack frontend".
const CONTAINMENT_FLOOR: f64 = 0.85;

/// A curated role → skills record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleMapping {
    /// Display form from the mapping source
    pub role: String,
    /// Canonical matching key
    pub normalized_role: String,
    /// Skill names as written in the mapping source, in curated order
    pub skills: Vec<String>,
}

/// An immutable lookup table from normalized role to mapping.
/// Built wholesale from the mapping source and never mutated afterwards.
pub struct MappingSnapshot {
    by_key: AHashMap<String, RoleMapping>,
}

impl MappingSnapshot {
    /// Build from raw (role, skills) records.
    ///
    /// Each role is normalized into its matching key; roles that are all
    /// noise words fall back to the plain cleaned form so they stay
    /// addressable. Records with an empty role or no skills are skipped;
    /// on duplicate keys the later record wins, matching source-file
    /// semantics where insertion order is irrelevant to lookup.
    #[must_use]
    pub fn build(records: Vec<(String, Vec<String>)>) -> Self {
        let mut by_key = AHashMap::with_capacity(records.len());

        for (role, skills) in records {
            let role = role.trim().to_string();
            let skills: Vec<String> = skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if role.is_empty() || skills.is_empty() {
                continue;
            }

            let mut key = normalize_role(&role);
            if key.is_empty() {
                key = normalize_text(&role);
            }
            if key.is_empty() {
                continue;
            }

            by_key.insert(
                key.clone(),
                RoleMapping {
                    role,
                    normalized_role: key,
                    skills,
                },
            );
        }

        Self { by_key }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_key: AHashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    #[must_use]
    pub fn lookup_exact(&self, normalized_role: &str) -> Option<&RoleMapping> {
        self.by_key.get(normalized_role)
    }

    /// Best fuzzy match whose similarity meets `threshold`.
    ///
    /// Scans every stored key with the given metric; containment between
    /// the query key and a stored key floors the score at 0.85. Ties are
    /// broken by the lexicographically smaller key so map iteration order
    /// never leaks into results.
    pub fn lookup_fuzzy(
        &self,
        normalized_role: &str,
        threshold: f64,
        metric: &dyn StringSimilarity,
    ) -> Option<(&RoleMapping, f64)> {
        if normalized_role.is_empty() {
            return None;
        }

        let mut best: Option<(&RoleMapping, f64)> = None;
        for (key, mapping) in &self.by_key {
            let mut score = metric.score(normalized_role, key);
            if key.contains(normalized_role) || normalized_role.contains(key) {
                score = score.max(CONTAINMENT_FLOOR);
            }

            let better = match best {
                None => true,
                Some((current, best_score)) => {
                    score > best_score
                        || (score == best_score && *key < current.normalized_role)
                }
            };
            if better {
                best = Some((mapping, score));
            }
        }

        best.filter(|(_, score)| *score >= threshold)
    }

    /// All mappings sorted by normalized key, for listing surfaces
    #[must_use]
    pub fn mappings(&self) -> Vec<&RoleMapping> {
        let mut all: Vec<&RoleMapping> = self.by_key.values().collect();
        all.sort_by(|a, b| a.normalized_role.cmp(&b.normalized_role));
        all
    }
}

/// Resolve curated skill-name strings to catalog entries by fuzzy name
/// match, absorbing spelling and casing drift between the mapping source
/// and the catalog ("React.js" vs "React js").
///
/// Returns one entry per input name; names with no candidate at or above
/// `threshold` resolve to `None` and are dropped silently by callers —
/// one unresolvable name must never fail a whole query. Equal-scoring
/// candidates resolve to the lower skill id for determinism.
pub fn resolve_skill_names(
    names: &[String],
    catalog: &[(i64, &str)],
    threshold: f64,
    metric: &dyn StringSimilarity,
) -> Vec<Option<Skill>> {
    names
        .iter()
        .map(|name| {
            let wanted = normalize_text(name);
            if wanted.is_empty() {
                return None;
            }

            let mut best: Option<(i64, &str, f64)> = None;
            for &(id, skill_name) in catalog {
                let candidate = normalize_text(skill_name);
                let score = if candidate == wanted {
                    1.0
                } else {
                    metric.score(&wanted, &candidate)
                };

                let better = match best {
                    None => true,
                    Some((best_id, _, best_score)) => {
                        score > best_score || (score == best_score && id < best_id)
                    }
                };
                if better {
                    best = Some((id, skill_name, score));
                }
            }

            match best {
                Some((id, skill_name, score)) if score >= threshold => {
                    Some(Skill::new(id, skill_name))
                }
                Some((_, _, score)) => {
                    tracing::debug!(name = %name, best_score = score, "skill name unresolved");
                    None
                }
                None => None,
            }
        })
        .collect()
}

/// The atomically replaceable reference to the current mapping table.
///
/// Unlike the vector index, an unpublished mapper is not an error: the
/// mapping source is optional, and an absent table simply means every
/// lookup misses and queries fall through to semantic search.
pub struct RoleMapper {
    current: RwLock<Option<Arc<MappingSnapshot>>>,
}

impl RoleMapper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Atomically publish a freshly built snapshot
    pub fn replace(&self, snapshot: MappingSnapshot) {
        *self.current.write() = Some(Arc::new(snapshot));
    }

    /// Capture the current snapshot, if one has been published
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<MappingSnapshot>> {
        self.current.read().clone()
    }

    /// Number of mapped roles; 0 before the first publish
    #[must_use]
    pub fn len(&self) -> usize {
        self.current
            .read()
            .as_ref()
            .map_or(0, |snapshot| snapshot.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RoleMapper {
    fn default() -> Self {
        Self::new()
    }
}
