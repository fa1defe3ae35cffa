//! Core matching types and identifiers.

pub mod config;
pub mod errors;
pub mod ids;
pub mod kinds;
pub mod message;
pub mod user_profile;

pub use config::{
    MatchConfig, MentalHealthConfig, OptimizerConfig, PenaltyConfig, ProfileConfig,
    QualityConfig, SilenceConfig, VirtualUserConfig, WeightConfig,
};
pub use errors::{MatchError, MatchResult};
pub use ids::{ConversationId, MatchId, MessageId, UserId, ViolationId};
pub use kinds::{
    EmotionLevel, FeedbackKind, InterestCategory, MbtiType, PenaltyKind, Scene, Severity,
    SilenceKind, ViolationType,
};
pub use message::{Message, MessageType};
pub use user_profile::{
    CommunicationStyle, Expressiveness, Interactivity, MessageLength, PersonalityTraits,
    UserProfile,
};
