pub mod program;
pub mod recommendation;

pub use program::Program;
pub use recommendation::{Recommendation, ScoredProgram, Strategy, UserProfile};
