use std::cmp::Ordering;

use ndarray::ArrayView1;

use crate::models::ScoredProgram;
use crate::services::artifacts::{ArtifactStore, AssetError};
use crate::services::explanation;

/// Generates content-based recommendations via TF-IDF cosine similarity
///
/// Returns up to `k` candidates with strictly positive similarity, ranked
/// descending. Never pads with zero-similarity results; callers get fewer
/// than `k` when fewer programs match at all.
pub fn recommend(
    store: &ArtifactStore,
    interests: &str,
    k: usize,
) -> Result<Vec<ScoredProgram>, AssetError> {
    let similarities = similarities(store, interests)?;

    let mut scored: Vec<(usize, f32)> = similarities.into_iter().enumerate().collect();
    // Stable descending sort: equal scores keep catalog order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    Ok(scored
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .take(k)
        .filter_map(|(idx, score)| {
            store.programs().get(idx).map(|program| ScoredProgram {
                program_id: program.id.clone(),
                score,
                explanation: explanation::content_explanation(interests, program),
            })
        })
        .collect())
}

/// Cosine similarity of the projected interests against every catalog row
///
/// Shared by the public entry point and the new-user collaborative path,
/// which needs the raw similarity vector without the positivity filter.
pub(crate) fn similarities(
    store: &ArtifactStore,
    interests: &str,
) -> Result<Vec<f32>, AssetError> {
    let vectorizer = store
        .vectorizer()
        .ok_or(AssetError::Missing("content-based model"))?;
    let matrix = store
        .term_matrix()
        .ok_or(AssetError::Missing("content-based model"))?;

    // The UI sends comma-separated interests; the model was trained on free
    // text, so commas become whitespace before projection.
    let model_interests = interests.replace(',', " ");
    let query = vectorizer.transform(&model_interests);

    Ok(matrix
        .rows()
        .into_iter()
        .map(|row| cosine(query.view(), row))
        .collect())
}

fn cosine(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom > 0.0 {
        a.dot(&b) / denom
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_fixtures;

    #[test]
    fn test_ranked_by_descending_similarity_without_duplicates() {
        let store = test_fixtures::store();
        let recs = recommend(&store, "mathematics art", 5).unwrap();

        assert_eq!(recs.len(), 2);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        let mut ids: Vec<&str> = recs.iter().map(|r| r.program_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), recs.len());
    }

    #[test]
    fn test_zero_similarity_programs_are_dropped() {
        let store = test_fixtures::store();
        let recs = recommend(&store, "technology, design", 5).unwrap();

        // Only the technology/design program matches; the scorer must not
        // pad with the other two zero-similarity programs.
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].program_id, "p1");
        assert!((recs[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_comma_separated_interests_match_free_text_training() {
        let store = test_fixtures::store();
        let with_commas = recommend(&store, "technology,design", 5).unwrap();
        let with_spaces = recommend(&store, "technology design", 5).unwrap();

        assert_eq!(with_commas.len(), with_spaces.len());
        assert!((with_commas[0].score - with_spaces[0].score).abs() < 1e-6);
    }

    #[test]
    fn test_k_truncates_results() {
        let store = test_fixtures::store();
        let recs = recommend(&store, "mathematics art", 1).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_no_matching_terms_yields_empty() {
        let store = test_fixtures::store();
        let recs = recommend(&store, "underwater basket weaving", 5).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_missing_content_assets_fail_the_request() {
        let store = test_fixtures::store_without_content_model();
        let err = recommend(&store, "technology", 5).unwrap_err();
        assert!(matches!(err, AssetError::Missing(_)));
    }

    #[test]
    fn test_explanation_names_matched_interests() {
        let store = test_fixtures::store();
        let recs = recommend(&store, "technology, design", 5).unwrap();
        assert!(recs[0].explanation.contains("technology and design"));
    }
}
