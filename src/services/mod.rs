pub mod artifacts;
pub mod collaborative;
pub mod content;
pub mod engine;
pub mod explanation;
pub mod feedback;
pub mod hybrid;

pub use artifacts::{ArtifactStore, AssetError};
pub use engine::{Capabilities, EngineConfig, RecommendationEngine};
pub use feedback::{FeedbackEvent, FeedbackSink, JsonlFeedbackLog};
pub use hybrid::HybridWeights;

#[cfg(test)]
pub(crate) mod test_fixtures;
