use std::sync::Arc;

use crate::services::{FeedbackSink, RecommendationEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Recommendation engine holding the immutable loaded artifacts
    pub engine: Arc<RecommendationEngine>,
    /// Append sink for user feedback events
    pub feedback: Arc<dyn FeedbackSink>,
    /// Result count used when the client does not pass k
    pub default_k: usize,
}

impl AppState {
    pub fn new(
        engine: Arc<RecommendationEngine>,
        feedback: Arc<dyn FeedbackSink>,
        default_k: usize,
    ) -> Self {
        Self {
            engine,
            feedback,
            default_k,
        }
    }
}
