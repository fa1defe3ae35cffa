//! Match scoring, feedback-driven weight adaptation and ranking.

pub mod compatibility;
pub mod feedback;
pub mod optimizer;
pub mod ranking;
pub mod weights;

pub use compatibility::{CompatibilityModel, ConstantCompatibility, personality_score};
pub use feedback::FeedbackRecord;
pub use optimizer::{MatchScore, MatchingOptimizer};
pub use ranking::{RankedCandidate, rank_candidates};
pub use weights::MatchWeights;
