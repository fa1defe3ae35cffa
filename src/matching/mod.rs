//! Matching subsystem for the campus social-matching application.
//!
//! This module is organized into:
//! - `core`: Configuration, errors, IDs, kinds, messages and user profiles
//! - `classify`: Keyword classification, moderation, mental-health and quality monitors
//! - `profile`: Interest extraction, personality estimation and profile updates
//! - `scoring`: Match weights, feedback-driven optimization and candidate ranking
//! - `virtual_users`: Synthetic candidates and their sampling weight
//! - `engine`: Message intake pipeline, violation log, silence detection and tracing bootstrap

pub mod classify;
pub mod core;
pub mod engine;
pub mod profile;
pub mod scoring;
pub mod virtual_users;

// Re-export commonly used types for convenience
pub use classify::{
    AdviceLevel, ContentModerator, ConversationQualityMonitor, EmotionRecord, HealthAdvice,
    HelpResource, KeywordClassifier, KeywordMatch, MentalHealthMonitor, ModerationAction,
    ModerationVerdict, QualityAssessment, QualityMetrics, QualityScore,
};
pub use core::{
    CommunicationStyle, ConversationId, EmotionLevel, Expressiveness, FeedbackKind,
    InterestCategory, Interactivity, MatchConfig, MatchError, MatchId, MatchResult, MbtiType,
    Message, MessageId, MessageLength, MessageType, MentalHealthConfig, OptimizerConfig,
    PenaltyConfig, PenaltyKind, PersonalityTraits, ProfileConfig, QualityConfig, Scene,
    Severity, SilenceConfig, SilenceKind, UserId, UserProfile, ViolationId, ViolationType,
    VirtualUserConfig,
};
pub use engine::{
    ChatPipeline, Delivery, MessageOutcome, Penalty, Silence, SilenceDetector, SilencePrompt,
    SilenceTrigger, ViolationHistory, ViolationRecord, init_tracing,
};
pub use profile::{
    InterestCount, InterestExtractor, PersonalityAnalyzer, ProfileDescription, ProfileUpdate,
    ProfileUpdater,
};
pub use scoring::{
    CompatibilityModel, ConstantCompatibility, FeedbackRecord, MatchScore, MatchWeights,
    MatchingOptimizer, RankedCandidate, rank_candidates,
};
pub use virtual_users::VirtualUserManager;
