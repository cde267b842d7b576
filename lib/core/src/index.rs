//! In-memory vector index: an immutable snapshot of unit-norm skill
//! embeddings behind an atomically replaceable reference. Queries capture
//! the current snapshot once and keep it for the whole call, so a refresh
//! publishing a new snapshot mid-query never tears a result set.

use crate::{Error, Result, Skill, SkillVector, Vector};
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

/// A scored candidate in the bounded top-k heap.
/// Greater = better: higher score first, ties broken by ascending skill id.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Hit {
    score: OrderedFloat<f32>,
    skill_id: i64,
}

impl Ord for Hit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.skill_id.cmp(&self.skill_id))
    }
}

impl PartialOrd for Hit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An immutable, fully built collection of skill vectors.
///
/// Built once per refresh and never mutated afterwards, so any number of
/// concurrent readers can search it without coordination. The skill ids
/// and vectors are parallel arrays; `names` carries the display names for
/// result formatting.
pub struct IndexSnapshot {
    ids: Vec<i64>,
    vectors: Vec<Vector>,
    names: AHashMap<i64, String>,
    dimension: usize,
    embedder_version: String,
}

impl IndexSnapshot {
    /// Assemble a snapshot from catalog skills and their embeddings.
    /// Every vector must have the configured dimension.
    pub fn build(
        dimension: usize,
        embedder_version: impl Into<String>,
        skills: &[Skill],
        vectors: Vec<SkillVector>,
    ) -> Result<Self> {
        let names: AHashMap<i64, String> = skills
            .iter()
            .map(|s| (s.id, s.name.clone()))
            .collect();

        let mut ids = Vec::with_capacity(vectors.len());
        let mut data = Vec::with_capacity(vectors.len());
        for sv in vectors {
            if sv.vector.dim() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: sv.vector.dim(),
                });
            }
            ids.push(sv.skill_id);
            data.push(sv.vector);
        }

        Ok(Self {
            ids,
            vectors: data,
            names,
            dimension,
            embedder_version: embedder_version.into(),
        })
    }

    /// An empty snapshot with the given dimension, used when the catalog
    /// has no active skills.
    #[must_use]
    pub fn empty(dimension: usize, embedder_version: impl Into<String>) -> Self {
        Self {
            ids: Vec::new(),
            vectors: Vec::new(),
            names: AHashMap::new(),
            dimension,
            embedder_version: embedder_version.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    #[must_use]
    pub fn embedder_version(&self) -> &str {
        &self.embedder_version
    }

    #[must_use]
    pub fn skill_name(&self, skill_id: i64) -> Option<&str> {
        self.names.get(&skill_id).map(String::as_str)
    }

    /// Iterate over the indexed skills as (id, name) pairs
    pub fn skills(&self) -> impl Iterator<Item = (i64, &str)> {
        self.ids
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| (*id, name.as_str())))
    }

    /// Iterate over the stored (id, vector) pairs
    pub fn entries(&self) -> impl Iterator<Item = (i64, &Vector)> {
        self.ids.iter().copied().zip(self.vectors.iter())
    }

    /// Top-k cosine similarity search.
    ///
    /// Brute-force linear scan over every stored vector: the catalog is
    /// bounded by tens of thousands of skills, so exact search stays cheap
    /// and a bounded heap keeps selection at O(N log k). Scores come back
    /// strictly descending, ties broken by ascending skill id. Threshold
    /// filtering is the combiner's job; this is a pure ranking primitive.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(i64, f32)>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.dim() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: query.dim(),
            });
        }

        // Min-heap of the k best hits seen so far; the root is the worst
        // kept hit and is evicted when a better one arrives.
        let mut heap: BinaryHeap<Reverse<Hit>> = BinaryHeap::with_capacity(k + 1);
        for (id, vector) in self.entries() {
            let hit = Hit {
                score: OrderedFloat(vector.dot(query)),
                skill_id: id,
            };
            heap.push(Reverse(hit));
            if heap.len() > k {
                heap.pop();
            }
        }

        let mut hits: Vec<Hit> = heap.into_iter().map(|Reverse(hit)| hit).collect();
        hits.sort_unstable_by(|a, b| b.cmp(a));
        Ok(hits
            .into_iter()
            .map(|hit| (hit.skill_id, hit.score.into_inner()))
            .collect())
    }
}

/// The atomically replaceable reference to the current snapshot.
///
/// `snapshot()` clones the inner `Arc` under a short read lock; the lock
/// is never held across a search. `replace` swaps the pointer, and old
/// snapshots are dropped once their last in-flight reader finishes.
pub struct VectorIndex {
    current: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl VectorIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Atomically publish a freshly built snapshot
    pub fn replace(&self, snapshot: IndexSnapshot) {
        *self.current.write() = Some(Arc::new(snapshot));
    }

    /// Capture the current snapshot for the duration of one call.
    /// Errors with `NotReady` before the first publish.
    pub fn snapshot(&self) -> Result<Arc<IndexSnapshot>> {
        self.current.read().clone().ok_or(Error::NotReady)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Number of indexed skills; 0 before the first publish
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

    /// Search against the snapshot captured at call start
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(i64, f32)>> {
        self.snapshot()?.search(query, k)
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(entries: &[(i64, &str, Vec<f32>)]) -> IndexSnapshot {
        let skills: Vec<Skill> = entries
            .iter()
            .map(|(id, name, _)| Skill::new(*id, *name))
            .collect();
        let vectors: Vec<SkillVector> = entries
            .iter()
            .map(|(id, _, v)| SkillVector {
                skill_id: *id,
                vector: Vector::new(v.clone()).normalized(),
            })
            .collect();
        let dim = entries[0].2.len();
        IndexSnapshot::build(dim, "test-v1", &skills, vectors).unwrap()
    }

    #[test]
    fn single_element_self_search_scores_one() {
        let v = Vector::new(vec![0.3, -0.2, 0.5]).normalized();
        let snapshot = snapshot_of(&[(42, "Rust", v.as_slice().to_vec())]);

        let results = snapshot.search(&v, 5).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 42);
        assert!((results[0].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn results_descend_with_ascending_id_tie_break() {
        // Two identical vectors tie; the lower id must come first.
        let snapshot = snapshot_of(&[
            (7, "B", vec![1.0, 0.0]),
            (3, "A", vec![1.0, 0.0]),
            (5, "C", vec![0.0, 1.0]),
        ]);
        let query = Vector::new(vec![1.0, 0.0]);

        let results = snapshot.search(&query, 3).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 3);
        assert_eq!(results[1].0, 7);
        assert_eq!(results[2].0, 5);
        assert!(results[0].1 >= results[1].1);
        assert!(results[1].1 > results[2].1);
    }

    #[test]
    fn k_bounds_the_result_length() {
        let snapshot = snapshot_of(&[
            (1, "A", vec![1.0, 0.0]),
            (2, "B", vec![0.9, 0.1]),
            (3, "C", vec![0.8, 0.2]),
            (4, "D", vec![0.0, 1.0]),
        ]);
        let query = Vector::new(vec![1.0, 0.0]);

        let results = snapshot.search(&query, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn empty_snapshot_returns_empty_not_error() {
        let snapshot = IndexSnapshot::empty(4, "test-v1");
        let query = Vector::new(vec![1.0, 0.0, 0.0, 0.0]);

        assert!(snapshot.search(&query, 10).unwrap().is_empty());
    }

    #[test]
    fn dimension_mismatch_fails_fast() {
        let snapshot = snapshot_of(&[(1, "A", vec![1.0, 0.0, 0.0])]);
        let query = Vector::new(vec![1.0, 0.0]);

        let err = snapshot.search(&query, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn index_is_not_ready_before_first_publish() {
        let index = VectorIndex::new();
        let query = Vector::new(vec![1.0]);

        assert!(!index.is_ready());
        assert!(matches!(index.search(&query, 1), Err(Error::NotReady)));
    }

    #[test]
    fn replace_publishes_atomically_for_captured_readers() {
        let index = VectorIndex::new();
        index.replace(snapshot_of(&[(1, "A", vec![1.0, 0.0])]));

        // A reader captures the current snapshot, then a refresh lands.
        let captured = index.snapshot().unwrap();
        index.replace(snapshot_of(&[
            (2, "B", vec![1.0, 0.0]),
            (3, "C", vec![0.0, 1.0]),
        ]));

        // The captured view is unchanged; new calls see the replacement.
        assert_eq!(captured.len(), 1);
        assert_eq!(index.len(), 2);
        let query = Vector::new(vec![1.0, 0.0]);
        assert_eq!(captured.search(&query, 10).unwrap()[0].0, 1);
        assert_eq!(index.search(&query, 10).unwrap()[0].0, 2);
    }
}
