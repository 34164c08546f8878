//! Shared in-memory artifact fixtures for service tests

use ndarray::{arr2, Array2};
use serde_json::json;

use crate::models::Program;
use crate::services::artifacts::{ArtifactStore, FactorModel, TfidfVectorizer};

fn programs() -> Vec<Program> {
    vec![
        Program::new(
            "p1".to_string(),
            "Software Engineering".to_string(),
            "Build modern applications.".to_string(),
            "technology, ux design".to_string(),
        ),
        Program::new(
            "p2".to_string(),
            "Fine Arts".to_string(),
            "Painting and sculpture.".to_string(),
            "art".to_string(),
        ),
        Program::new(
            "p3".to_string(),
            "Applied Mathematics".to_string(),
            "Statistics and modelling.".to_string(),
            "mathematics".to_string(),
        ),
    ]
}

fn vectorizer() -> TfidfVectorizer {
    serde_json::from_value(json!({
        "vocabulary": {"technology": 0, "design": 1, "mathematics": 2, "art": 3},
        "idf": [1.0, 1.0, 1.0, 1.0],
    }))
    .unwrap()
}

fn term_matrix() -> Array2<f32> {
    arr2(&[
        [0.70710678, 0.70710678, 0.0, 0.0], // p1: technology + design
        [0.0, 0.0, 0.0, 1.0],               // p2: art
        [0.0, 0.0, 1.0, 0.0],               // p3: mathematics
    ])
}

fn factors() -> FactorModel {
    serde_json::from_value(json!({
        "user_factors": {"rows": 2, "cols": 2, "data": [1.0, 0.0, 0.0, 1.0]},
        "singular_values": [1.0, 1.0],
        "item_factors": {"rows": 2, "cols": 3, "data": [0.9, 0.1, 0.5, 0.2, 0.2, 0.2]},
        "user_ids": ["u1", "u2"],
        "program_ids": ["p1", "p2", "p3"],
    }))
    .unwrap()
}

/// Full artifact set: vectorizer, term matrix and factor model
pub(crate) fn store() -> ArtifactStore {
    ArtifactStore::from_parts(
        Some(vectorizer()),
        Some(term_matrix()),
        Some(factors()),
        programs(),
    )
    .unwrap()
}

/// Content model only; the factor model artifact is absent
pub(crate) fn store_without_factors() -> ArtifactStore {
    ArtifactStore::from_parts(Some(vectorizer()), Some(term_matrix()), None, programs()).unwrap()
}

/// Factor model only; the vectorizer and term matrix are absent
pub(crate) fn store_without_content_model() -> ArtifactStore {
    ArtifactStore::from_parts(None, None, Some(factors()), programs()).unwrap()
}

/// Single program whose best similarity falls below the hybrid relevance
/// floor
pub(crate) fn store_with_weak_match() -> ArtifactStore {
    let vectorizer: TfidfVectorizer = serde_json::from_value(json!({
        "vocabulary": {"technology": 0, "filler": 1},
        "idf": [1.0, 1.0],
    }))
    .unwrap();
    let matrix = arr2(&[[0.01f32, 1.0]]);
    let programs = vec![Program::new(
        "weak".to_string(),
        "Filler Studies".to_string(),
        "Mostly filler.".to_string(),
        "filler".to_string(),
    )];
    ArtifactStore::from_parts(Some(vectorizer), Some(matrix), None, programs).unwrap()
}
