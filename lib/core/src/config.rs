/// Upper bound on the raw role string accepted by `suggest`
pub const MAX_ROLE_LEN: usize = 500;

/// Upper bound on the per-query result limit
pub const MAX_LIMIT: usize = 50;

/// Confidence assigned to skills reached through the curated mapping table.
/// Scaled down by the match score when the role match was fuzzy.
pub const MAPPED_CONFIDENCE: f32 = 0.95;

/// Options controlling a single suggest call
#[derive(Debug, Clone)]
pub struct SuggestOptions {
    /// Maximum number of suggestions to return (1..=50)
    pub limit: usize,
    /// Consult the curated role → skills table before semantic search
    pub use_mapping: bool,
    /// Minimum cosine similarity for semantic results
    pub threshold: f32,
    /// Minimum similarity for fuzzy role lookup and skill-name resolution
    pub fuzzy_threshold: f64,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            use_mapping: true,
            threshold: 0.45,
            fuzzy_threshold: 0.7,
        }
    }
}

impl SuggestOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, use_mapping: bool) -> Self {
        self.use_mapping = use_mapping;
        self
    }
}
