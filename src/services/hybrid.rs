use std::collections::{HashMap, HashSet};

use crate::models::ScoredProgram;
use crate::services::artifacts::{ArtifactStore, AssetError};
use crate::services::{collaborative, content};

/// Width of the candidate sets requested from each underlying scorer
const CANDIDATE_POOL: usize = 20;
/// Combined scores at or below this are considered noise
const RELEVANCE_FLOOR: f32 = 0.01;

const HYBRID_EXPLANATION: &str =
    "Recommended based on your interests and similar user preferences.";

/// Weights for the linear fusion of content and collaborative scores
#[derive(Debug, Clone, Copy)]
pub struct HybridWeights {
    pub content: f32,
    pub collaborative: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            content: 0.6,
            collaborative: 0.4,
        }
    }
}

/// Fuses content and collaborative rankings into one deduplicated list
///
/// The collaborative side uses the existing-user path when a user id is
/// present and the simulated new-user path otherwise. A missing content
/// model fails the whole call; content is the baseline signal and fusion
/// has no independent recovery for it.
pub fn recommend(
    store: &ArtifactStore,
    interests: &str,
    user_id: Option<&str>,
    k: usize,
    weights: HybridWeights,
) -> Result<Vec<ScoredProgram>, AssetError> {
    let content_recs = content::recommend(store, interests, CANDIDATE_POOL)?;
    let mut content_scores: HashMap<String, f32> = HashMap::new();
    let mut content_explanations: HashMap<String, String> = HashMap::new();
    for rec in content_recs {
        content_scores.insert(rec.program_id.clone(), rec.score);
        content_explanations.insert(rec.program_id, rec.explanation);
    }

    let cf_recs = match user_id {
        Some(user_id) => collaborative::recommend_for_user(store, user_id, CANDIDATE_POOL),
        None => collaborative::recommend_for_new_user(store, interests, CANDIDATE_POOL),
    };
    let cf_scores: HashMap<String, f32> = cf_recs
        .into_iter()
        .map(|rec| (rec.program_id, rec.score))
        .collect();

    let max_cf = cf_scores.values().copied().fold(f32::NEG_INFINITY, f32::max);

    let candidates: HashSet<String> = content_scores
        .keys()
        .chain(cf_scores.keys())
        .cloned()
        .collect();

    let mut combined: Vec<(String, f32)> = candidates
        .into_iter()
        .map(|program_id| {
            let content_score = content_scores.get(&program_id).copied().unwrap_or(0.0);
            let score = if cf_scores.is_empty() {
                // The collaborative scorer produced nothing at all; the
                // hybrid score degenerates to the content score alone.
                content_score
            } else {
                let cf_score = cf_scores.get(&program_id).copied().unwrap_or(0.0);
                let cf_norm = if max_cf > 0.0 { cf_score / max_cf } else { 0.0 };
                weights.content * content_score + weights.collaborative * cf_norm
            };
            (program_id, score)
        })
        .collect();

    // Descending by score; ties break on program id so output is
    // deterministic across runs.
    combined.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut selected: Vec<(String, f32)> = combined
        .iter()
        .filter(|(_, score)| *score > RELEVANCE_FLOOR)
        .take(k)
        .cloned()
        .collect();

    // Too few candidates clear the relevance floor: discard the floor and
    // fill from the unfiltered ranking so callers still get k results
    // whenever k candidates exist at all.
    if selected.len() < k {
        selected = combined.into_iter().take(k).collect();
    }

    Ok(selected
        .into_iter()
        .map(|(program_id, score)| {
            let explanation = content_explanations
                .remove(&program_id)
                .unwrap_or_else(|| HYBRID_EXPLANATION.to_string());
            ScoredProgram {
                program_id,
                score,
                explanation,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_fixtures;

    #[test]
    fn test_weighted_fusion_with_floor_fallback() {
        let store = test_fixtures::store();
        let recs = recommend(
            &store,
            "technology, design",
            Some("u1"),
            3,
            HybridWeights::default(),
        )
        .unwrap();

        // Content: p1 = 1.0. Collaborative (u1, normalized): p1 = 1.0,
        // p3 = 0.5, p2 = 0.0. Fused: p1 = 1.0, p3 = 0.2, p2 = 0.0. Only two
        // clear the 0.01 floor, so the floor is dropped to honor k = 3.
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].program_id, "p1");
        assert_eq!(recs[1].program_id, "p3");
        assert_eq!(recs[2].program_id, "p2");
        assert!((recs[0].score - 1.0).abs() < 1e-5);
        assert!((recs[1].score - 0.2).abs() < 1e-5);
        assert!((recs[2].score - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_content_explanation_preferred_over_generic() {
        let store = test_fixtures::store();
        let recs = recommend(
            &store,
            "technology, design",
            Some("u1"),
            3,
            HybridWeights::default(),
        )
        .unwrap();

        assert!(recs[0].explanation.contains("technology and design"));
        // p3 never appeared in the content set, so it gets the fallback.
        assert_eq!(recs[1].explanation, HYBRID_EXPLANATION);
    }

    #[test]
    fn test_empty_collaborative_degenerates_to_content_score() {
        let store = test_fixtures::store_without_factors();
        let recs = recommend(
            &store,
            "technology, design",
            Some("u1"),
            3,
            HybridWeights::default(),
        )
        .unwrap();

        // No fusion weighting applied: the hybrid score is the content
        // score exactly.
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].program_id, "p1");
        assert!((recs[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_returns_min_k_and_candidate_count() {
        let store = test_fixtures::store_without_factors();
        let recs = recommend(&store, "technology", None, 10, HybridWeights::default()).unwrap();
        assert_eq!(recs.len(), 1);

        let recs = recommend(&store, "mathematics art", None, 1, HybridWeights::default()).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_all_below_floor_still_returns_k() {
        let store = test_fixtures::store_with_weak_match();
        let recs = recommend(&store, "technology", None, 1, HybridWeights::default()).unwrap();

        assert_eq!(recs.len(), 1);
        assert!(recs[0].score <= RELEVANCE_FLOOR);
    }

    #[test]
    fn test_missing_content_model_fails_the_call() {
        let store = test_fixtures::store_without_content_model();
        let err = recommend(&store, "technology", None, 3, HybridWeights::default()).unwrap_err();
        assert!(matches!(err, AssetError::Missing(_)));
    }

    #[test]
    fn test_new_user_path_taken_without_user_id() {
        let store = test_fixtures::store();
        let recs = recommend(
            &store,
            "technology, design",
            None,
            3,
            HybridWeights::default(),
        )
        .unwrap();

        // New-user CF (normalized): p1 = 1.0, p3 = 0.5, p2 = 0.0, fused
        // with content p1 = 1.0.
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].program_id, "p1");
        assert!((recs[0].score - 1.0).abs() < 1e-5);
    }
}
