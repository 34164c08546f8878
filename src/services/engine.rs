use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;

use crate::models::{Program, Recommendation, ScoredProgram, Strategy, UserProfile};
use crate::services::artifacts::{ArtifactStore, AssetError};
use crate::services::hybrid::HybridWeights;
use crate::services::{collaborative, content, hybrid};

/// Engine configuration: where artifacts live and how hybrid fusion weighs
/// its two signals
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub artifact_dir: PathBuf,
    pub weights: HybridWeights,
}

/// Which artifacts are currently loaded, for the health probe
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Capabilities {
    pub loaded: bool,
    pub tfidf: bool,
    pub factor_model: bool,
    pub programs: bool,
}

/// Hybrid recommendation engine combining content-based and collaborative
/// filtering
///
/// Holds the immutable loaded artifacts behind a one-time initialization
/// guard. Scoring is pure in-memory computation over `Arc`-shared state and
/// runs freely in parallel across requests.
pub struct RecommendationEngine {
    config: EngineConfig,
    ready: AtomicBool,
    load_lock: Mutex<()>,
    store: RwLock<Option<Arc<ArtifactStore>>>,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ready: AtomicBool::new(false),
            load_lock: Mutex::new(()),
            store: RwLock::new(None),
        }
    }

    /// Loads all artifacts from disk; a no-op once loaded
    ///
    /// The load step is serialized behind a mutex with a double-checked
    /// ready flag, so concurrent first requests do the I/O once.
    pub fn load(&self) -> Result<(), AssetError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }
        let _guard = self.load_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let store = ArtifactStore::load(&self.config.artifact_dir)?;
        tracing::info!(
            programs = store.programs().len(),
            tfidf = store.vectorizer().is_some(),
            factor_model = store.factors().is_some(),
            "recommendation artifacts loaded"
        );

        *self.store.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(store));
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Capability probe used by the health endpoint
    pub fn capabilities(&self) -> Capabilities {
        let guard = self.store.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(store) => Capabilities {
                loaded: true,
                tfidf: store.vectorizer().is_some() && store.term_matrix().is_some(),
                factor_model: store.factors().is_some(),
                programs: !store.programs().is_empty(),
            },
            None => Capabilities {
                loaded: false,
                tfidf: false,
                factor_model: false,
                programs: false,
            },
        }
    }

    /// Program catalog, for the listing endpoint
    pub fn programs(&self) -> Result<Vec<Program>, AssetError> {
        Ok(self.store()?.programs().to_vec())
    }

    /// Generates up to `k` recommendations with full program detail attached
    ///
    /// The collaborative strategy applies the fallback chain: existing-user
    /// CF, then simulated CF for the new-user case, then content-based. A
    /// chain that empties out is a valid empty response, not an error.
    pub fn recommend(
        &self,
        strategy: Strategy,
        profile: &UserProfile,
        k: usize,
    ) -> Result<Vec<Recommendation>, AssetError> {
        let store = self.store()?;
        tracing::info!(
            approach = %strategy,
            k,
            known_user = profile.user_id.is_some(),
            "generating recommendations"
        );

        let scored = match strategy {
            Strategy::Content => content::recommend(&store, &profile.interests, k)?,
            Strategy::Collaborative => self.collaborative_with_fallback(&store, profile, k)?,
            Strategy::Hybrid => hybrid::recommend(
                &store,
                &profile.interests,
                profile.user_id.as_deref(),
                k,
                self.config.weights,
            )?,
        };

        Ok(attach_program_details(&store, scored))
    }

    fn collaborative_with_fallback(
        &self,
        store: &ArtifactStore,
        profile: &UserProfile,
        k: usize,
    ) -> Result<Vec<ScoredProgram>, AssetError> {
        if let Some(user_id) = profile.user_id.as_deref() {
            let scored = collaborative::recommend_for_user(store, user_id, k);
            if !scored.is_empty() {
                return Ok(scored);
            }
        }

        let scored = collaborative::recommend_for_new_user(store, &profile.interests, k);
        if !scored.is_empty() {
            return Ok(scored);
        }

        tracing::debug!("collaborative scorers empty, falling back to content-based");
        content::recommend(store, &profile.interests, k)
    }

    fn store(&self) -> Result<Arc<ArtifactStore>, AssetError> {
        let guard = self.store.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().cloned().ok_or(AssetError::NotLoaded)
    }
}

/// Looks up full program detail for each candidate, skipping ids with no
/// catalog entry
fn attach_program_details(
    store: &ArtifactStore,
    scored: Vec<ScoredProgram>,
) -> Vec<Recommendation> {
    scored
        .into_iter()
        .filter_map(|candidate| {
            let program = store.program(&candidate.program_id)?;
            Some(Recommendation {
                program_id: program.id.clone(),
                program_name: program.name.clone(),
                description: program.description.clone(),
                skills: program.tags_text.clone(),
                score: candidate.score,
                explanation: candidate.explanation,
                url: program.url.clone(),
                rating: program.rating,
            })
        })
        .collect()
}
