use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Program;

/// Fitted TF-IDF vectorizer artifact file name
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
/// Precomputed program-by-term matrix artifact file name
pub const TERM_MATRIX_FILE: &str = "program_tfidf.json";
/// Precomputed SVD factor model artifact file name
pub const FACTOR_MODEL_FILE: &str = "svd_model.json";
/// Program catalog file name
pub const PROGRAMS_FILE: &str = "programs.json";

/// Error types for artifact loading and availability
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("recommendation artifacts not loaded")]
    NotLoaded,

    #[error("{0} not available")]
    Missing(&'static str),

    #[error("invalid artifact in {file}: {reason}")]
    Invalid { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Splits text into lowercase tokens, treating commas as separators
///
/// The vector space was trained on free text, so comma-separated interest
/// lists are normalized to whitespace before tokenization.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase().replace(',', " ");
    normalized.split_whitespace().map(str::to_owned).collect()
}

/// Fitted TF-IDF vectorizer
///
/// Consumed as a trained artifact: a term vocabulary with one IDF weight per
/// vocabulary index. Fitting happens in the offline training pipeline, never
/// here.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    /// term -> dimension index
    vocabulary: HashMap<String, usize>,
    /// IDF weight per dimension
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn vocab_len(&self) -> usize {
        self.idf.len()
    }

    fn validate(&self) -> Result<(), AssetError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(AssetError::Invalid {
                file: VECTORIZER_FILE.to_string(),
                reason: format!(
                    "vocabulary has {} terms but {} idf weights",
                    self.vocabulary.len(),
                    self.idf.len()
                ),
            });
        }
        for (term, &idx) in &self.vocabulary {
            if idx >= self.idf.len() {
                return Err(AssetError::Invalid {
                    file: VECTORIZER_FILE.to_string(),
                    reason: format!("term '{}' maps to out-of-range index {}", term, idx),
                });
            }
        }
        Ok(())
    }

    /// Projects text into the term vector space
    ///
    /// Term frequency times IDF, L2-normalized so cosine similarity against
    /// other unit vectors reduces to a dot product. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let mut vector = Array1::<f32>::zeros(self.idf.len());
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                vector[idx] += 1.0;
            }
        }
        for (value, weight) in vector.iter_mut().zip(self.idf.iter()) {
            *value *= weight;
        }
        let norm = vector.dot(&vector).sqrt();
        if norm > 0.0 {
            vector /= norm;
        }
        vector
    }
}

/// Dense matrix as serialized by the training pipeline: shape plus flat
/// row-major data
#[derive(Debug, Deserialize)]
struct DenseMatrixFile {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl DenseMatrixFile {
    fn into_array(self, file: &str) -> Result<Array2<f32>, AssetError> {
        Array2::from_shape_vec((self.rows, self.cols), self.data).map_err(|e| {
            AssetError::Invalid {
                file: file.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct FactorModelFile {
    user_factors: DenseMatrixFile,
    singular_values: Vec<f32>,
    item_factors: DenseMatrixFile,
    user_ids: Vec<String>,
    program_ids: Vec<String>,
}

/// Precomputed SVD-style factorization of the user-program interaction matrix
///
/// Shape consistency is validated once at deserialization time; lookups of
/// unknown user or program identifiers return `None` rather than failing the
/// request.
#[derive(Debug, Clone)]
pub struct FactorModel {
    /// User latent factors: n_users x k
    user_factors: Array2<f32>,
    /// Singular-value weights: k
    singular_values: Array1<f32>,
    /// Item latent factors: k x n_items
    item_factors: Array2<f32>,
    program_ids: Vec<String>,
    user_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
}

impl FactorModel {
    fn from_file(file: FactorModelFile) -> Result<Self, AssetError> {
        let user_factors = file.user_factors.into_array(FACTOR_MODEL_FILE)?;
        let item_factors = file.item_factors.into_array(FACTOR_MODEL_FILE)?;
        let singular_values = Array1::from_vec(file.singular_values);

        let k = singular_values.len();
        let invalid = |reason: String| AssetError::Invalid {
            file: FACTOR_MODEL_FILE.to_string(),
            reason,
        };
        if user_factors.ncols() != k || item_factors.nrows() != k {
            return Err(invalid(format!(
                "factor rank mismatch: user factors {}x{}, {} singular values, item factors {}x{}",
                user_factors.nrows(),
                user_factors.ncols(),
                k,
                item_factors.nrows(),
                item_factors.ncols()
            )));
        }
        if user_factors.nrows() != file.user_ids.len() {
            return Err(invalid(format!(
                "{} user factor rows for {} user ids",
                user_factors.nrows(),
                file.user_ids.len()
            )));
        }
        if item_factors.ncols() != file.program_ids.len() {
            return Err(invalid(format!(
                "{} item factor columns for {} program ids",
                item_factors.ncols(),
                file.program_ids.len()
            )));
        }

        let user_index = file
            .user_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        let item_index = file
            .program_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        Ok(Self {
            user_factors,
            singular_values,
            item_factors,
            program_ids: file.program_ids,
            user_index,
            item_index,
        })
    }

    /// Factor row for a known user, `None` when the user was not in the
    /// training data
    pub fn user_row(&self, user_id: &str) -> Option<ArrayView1<'_, f32>> {
        let &idx = self.user_index.get(user_id)?;
        Some(self.user_factors.row(idx))
    }

    /// Item factor column for a known program, `None` when the program was
    /// not in the training data
    pub fn item_column(&self, program_id: &str) -> Option<ArrayView1<'_, f32>> {
        let &idx = self.item_index.get(program_id)?;
        Some(self.item_factors.column(idx))
    }

    /// Predicted score per item for a user factor: `(u ∘ σ) · Vᵀ`
    pub fn predict(&self, user_factor: ArrayView1<'_, f32>) -> Array1<f32> {
        (&user_factor * &self.singular_values).dot(&self.item_factors)
    }

    pub fn program_id_at(&self, idx: usize) -> Option<&str> {
        self.program_ids.get(idx).map(String::as_str)
    }

    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }
}

impl<'de> serde::Deserialize<'de> for FactorModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let file = FactorModelFile::deserialize(deserializer)?;
        FactorModel::from_file(file).map_err(serde::de::Error::custom)
    }
}

/// Immutable store of all trained artifacts plus the program catalog
///
/// Tolerates any subset of the model artifacts being absent (partial
/// capability); absence of the catalog is fatal since nothing can be
/// returned without it.
#[derive(Debug)]
pub struct ArtifactStore {
    vectorizer: Option<TfidfVectorizer>,
    term_matrix: Option<Array2<f32>>,
    factors: Option<FactorModel>,
    programs: Vec<Program>,
    by_id: HashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct ProgramRecord {
    program_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags_text: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    rating: Option<f32>,
}

impl ArtifactStore {
    /// Loads all artifacts from a directory of JSON files
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let Some(records) = read_optional::<Vec<ProgramRecord>>(dir, PROGRAMS_FILE)? else {
            return Err(AssetError::Missing("program catalog"));
        };
        let programs = records
            .into_iter()
            .map(|r| {
                let mut program = Program::new(r.program_id, r.name, r.description, r.tags_text);
                program.url = r.url;
                program.rating = r.rating;
                program
            })
            .collect();

        let vectorizer = read_optional::<TfidfVectorizer>(dir, VECTORIZER_FILE)?;
        let term_matrix = read_optional::<DenseMatrixFile>(dir, TERM_MATRIX_FILE)?
            .map(|m| m.into_array(TERM_MATRIX_FILE))
            .transpose()?;
        let factors = read_optional::<FactorModel>(dir, FACTOR_MODEL_FILE)?;

        Self::from_parts(vectorizer, term_matrix, factors, programs)
    }

    /// Assembles a store from already-deserialized parts, validating the
    /// cross-artifact shape invariants
    pub fn from_parts(
        vectorizer: Option<TfidfVectorizer>,
        term_matrix: Option<Array2<f32>>,
        factors: Option<FactorModel>,
        programs: Vec<Program>,
    ) -> Result<Self, AssetError> {
        if programs.is_empty() {
            return Err(AssetError::Missing("program catalog"));
        }

        if let Some(vectorizer) = &vectorizer {
            vectorizer.validate()?;
        }

        if let Some(matrix) = &term_matrix {
            // Row order must match catalog order exactly; misalignment would
            // silently corrupt every content score, so reject it at load.
            if matrix.nrows() != programs.len() {
                return Err(AssetError::Invalid {
                    file: TERM_MATRIX_FILE.to_string(),
                    reason: format!(
                        "{} matrix rows for {} catalog programs",
                        matrix.nrows(),
                        programs.len()
                    ),
                });
            }
            if let Some(vectorizer) = &vectorizer {
                if matrix.ncols() != vectorizer.vocab_len() {
                    return Err(AssetError::Invalid {
                        file: TERM_MATRIX_FILE.to_string(),
                        reason: format!(
                            "{} matrix columns for a {}-term vocabulary",
                            matrix.ncols(),
                            vectorizer.vocab_len()
                        ),
                    });
                }
            }
        }

        let mut by_id = HashMap::with_capacity(programs.len());
        for (idx, program) in programs.iter().enumerate() {
            if by_id.insert(program.id.clone(), idx).is_some() {
                return Err(AssetError::Invalid {
                    file: PROGRAMS_FILE.to_string(),
                    reason: format!("duplicate program id '{}'", program.id),
                });
            }
        }

        Ok(Self {
            vectorizer,
            term_matrix,
            factors,
            programs,
            by_id,
        })
    }

    pub fn vectorizer(&self) -> Option<&TfidfVectorizer> {
        self.vectorizer.as_ref()
    }

    pub fn term_matrix(&self) -> Option<&Array2<f32>> {
        self.term_matrix.as_ref()
    }

    pub fn factors(&self) -> Option<&FactorModel> {
        self.factors.as_ref()
    }

    /// Program catalog, in artifact order
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn program(&self, id: &str) -> Option<&Program> {
        self.by_id.get(id).map(|&idx| &self.programs[idx])
    }
}

fn read_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Option<T>, AssetError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path)?;
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| AssetError::Invalid {
            file: file.to_string(),
            reason: e.to_string(),
        })
}
