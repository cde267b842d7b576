//! The hybrid combiner: normalizes the query, consults the curated role
//! mapping first, then fills the remaining slots from semantic vector
//! search, deduplicating across sources and attributing every result.

use crate::config::{SuggestOptions, MAPPED_CONFIDENCE, MAX_LIMIT, MAX_ROLE_LEN};
use crate::index::VectorIndex;
use crate::mapper::{resolve_skill_names, RoleMapper};
use crate::normalizer::normalize_role;
use crate::similarity::StringSimilarity;
use crate::{Embedder, Error, Result, SearchMethod, Source, Suggestion};
use std::collections::HashSet;

/// The outcome of one suggest call
#[derive(Debug, Clone)]
pub struct SuggestOutcome {
    pub normalized_role: String,
    pub search_method: SearchMethod,
    pub skills: Vec<Suggestion>,
}

/// Suggest skills for a free-text role.
///
/// Captures the current index snapshot once and uses it for the entire
/// call (mapping resolution and semantic search), so a refresh landing
/// mid-query can never produce a mixed view. Mapped results come first in
/// resolution order, then semantic results by descending score, truncated
/// to `opts.limit`.
pub fn suggest(
    index: &VectorIndex,
    mapper: &RoleMapper,
    embedder: &dyn Embedder,
    metric: &dyn StringSimilarity,
    raw_role: &str,
    opts: &SuggestOptions,
) -> Result<SuggestOutcome> {
    validate(raw_role, opts)?;

    let normalized = normalize_role(raw_role);
    let snapshot = index.snapshot()?;

    let mut seen: HashSet<i64> = HashSet::new();
    let mut mapped: Vec<Suggestion> = Vec::new();

    if opts.use_mapping && !normalized.is_empty() {
        if let Some(mappings) = mapper.snapshot() {
            let found = mappings
                .lookup_exact(&normalized)
                .map(|mapping| (mapping, 1.0, true))
                .or_else(|| {
                    mappings
                        .lookup_fuzzy(&normalized, opts.fuzzy_threshold, metric)
                        .map(|(mapping, score)| (mapping, score, false))
                });

            if let Some((mapping, match_score, exact)) = found {
                tracing::debug!(
                    normalized = %normalized,
                    matched = %mapping.normalized_role,
                    match_score,
                    exact,
                    "role mapping hit"
                );

                // Exact role matches keep the full mapped confidence; a
                // fuzzy role match scales it by the match score.
                let confidence = if exact {
                    MAPPED_CONFIDENCE
                } else {
                    MAPPED_CONFIDENCE * match_score as f32
                };

                let catalog: Vec<(i64, &str)> = snapshot.skills().collect();
                for skill in
                    resolve_skill_names(&mapping.skills, &catalog, opts.fuzzy_threshold, metric)
                        .into_iter()
                        .flatten()
                {
                    if seen.insert(skill.id) {
                        mapped.push(Suggestion {
                            skill_id: skill.id,
                            skill_name: skill.name,
                            confidence,
                            source: Source::Mapped,
                        });
                    }
                }
                mapped.truncate(opts.limit);
            }
        }
    }

    // Semantic search fills whatever the mapping left open. A role that
    // normalized to the empty string still goes through here: the
    // embedder's degenerate empty-input vector scores below threshold
    // against everything, which naturally yields no results.
    let mut semantic: Vec<Suggestion> = Vec::new();
    let remaining = opts.limit - mapped.len();
    if remaining > 0 {
        let query = embedder.embed(&normalized)?;
        for (skill_id, score) in snapshot.search(&query, opts.limit)? {
            if score < opts.threshold {
                break;
            }
            if seen.contains(&skill_id) {
                continue;
            }
            let Some(name) = snapshot.skill_name(skill_id) else {
                continue;
            };
            semantic.push(Suggestion {
                skill_id,
                skill_name: name.to_string(),
                confidence: score,
                source: Source::Semantic,
            });
            if semantic.len() == remaining {
                break;
            }
        }
    }

    let search_method = match (mapped.is_empty(), semantic.is_empty()) {
        (false, false) => SearchMethod::Hybrid,
        (false, true) => SearchMethod::Mapped,
        _ => SearchMethod::Semantic,
    };

    let mut skills = mapped;
    skills.extend(semantic);

    Ok(SuggestOutcome {
        normalized_role: normalized,
        search_method,
        skills,
    })
}

fn validate(raw_role: &str, opts: &SuggestOptions) -> Result<()> {
    if raw_role.trim().is_empty() {
        return Err(Error::Validation("role must not be empty".to_string()));
    }
    if raw_role.len() > MAX_ROLE_LEN {
        return Err(Error::Validation(format!(
            "role exceeds {MAX_ROLE_LEN} characters"
        )));
    }
    if opts.limit == 0 || opts.limit > MAX_LIMIT {
        return Err(Error::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(())
}
