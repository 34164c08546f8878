use std::cmp::Ordering;

use ndarray::Array1;

use crate::models::ScoredProgram;
use crate::services::artifacts::{ArtifactStore, FactorModel};
use crate::services::content;

/// Content-similar programs considered when synthesizing a new-user profile
const SIMILAR_POOL: usize = 20;
/// Of those, how many item-factor columns feed the pseudo user-factor
const SEED_PROGRAMS: usize = 10;

const EXISTING_USER_EXPLANATION: &str = "Users with similar interests also liked this program.";
const NEW_USER_EXPLANATION: &str =
    "Based on your interests, users with similar profiles have enjoyed this program.";

/// Collaborative recommendations for a user present in the factor model
///
/// An unknown user or an absent factor model is an expected, recoverable
/// case and yields an empty result, never an error.
pub fn recommend_for_user(store: &ArtifactStore, user_id: &str, k: usize) -> Vec<ScoredProgram> {
    let Some(factors) = store.factors() else {
        return Vec::new();
    };
    let Some(user_row) = factors.user_row(user_id) else {
        tracing::debug!(user_id, "user not in factor model");
        return Vec::new();
    };

    let predicted = factors.predict(user_row);
    rank_and_normalize(factors, &predicted, k, EXISTING_USER_EXPLANATION)
}

/// Approximates a collaborative ranking for a user with no interaction
/// history
///
/// Synthesizes a pseudo user-factor by averaging the item-factor columns of
/// the programs most content-similar to the interests, then predicts through
/// the same factor chain as the existing-user path.
pub fn recommend_for_new_user(
    store: &ArtifactStore,
    interests: &str,
    k: usize,
) -> Vec<ScoredProgram> {
    let Some(factors) = store.factors() else {
        return Vec::new();
    };
    let Ok(similarities) = content::similarities(store, interests) else {
        return Vec::new();
    };

    let mut columns: Vec<Array1<f32>> = Vec::new();
    for idx in top_indices(&similarities, SIMILAR_POOL).into_iter().take(SEED_PROGRAMS) {
        let Some(program) = store.programs().get(idx) else {
            continue;
        };
        if let Some(column) = factors.item_column(&program.id) {
            columns.push(column.to_owned());
        }
    }
    if columns.is_empty() {
        return Vec::new();
    }

    let mut pseudo_user_factor = Array1::<f32>::zeros(factors.rank());
    for column in &columns {
        pseudo_user_factor += column;
    }
    pseudo_user_factor /= columns.len() as f32;

    let predicted = factors.predict(pseudo_user_factor.view());
    rank_and_normalize(factors, &predicted, k, NEW_USER_EXPLANATION)
}

fn rank_and_normalize(
    factors: &FactorModel,
    predicted: &Array1<f32>,
    k: usize,
    explanation: &str,
) -> Vec<ScoredProgram> {
    let scores = predicted.to_vec();
    let mut chosen: Vec<(String, f32)> = Vec::new();
    for idx in top_indices(&scores, k) {
        if let Some(program_id) = factors.program_id_at(idx) {
            chosen.push((program_id.to_owned(), scores[idx]));
        }
    }

    let raw: Vec<f32> = chosen.iter().map(|(_, score)| *score).collect();
    let normalized = min_max_normalize(&raw);

    chosen
        .into_iter()
        .zip(normalized)
        .map(|((program_id, _), score)| ScoredProgram {
            program_id,
            score,
            explanation: explanation.to_string(),
        })
        .collect()
}

/// Indices of the `k` highest scores, descending
///
/// Stable ascending sort followed by reversal, so among tied scores the
/// last occurrence in array order wins.
pub(crate) fn top_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));
    indices.into_iter().rev().take(k).collect()
}

/// Min-max normalization to [0, 1]; an all-equal score set maps to all 1.0
pub(crate) fn min_max_normalize(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max == min {
        return vec![1.0; scores.len()];
    }
    scores.iter().map(|s| (s - min) / (max - min)).collect()
}
