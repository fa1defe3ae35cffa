//! Keyword-based classifiers for chat messages.

pub mod keyword;
pub mod lexicon;
pub mod mental_health;
pub mod moderation;
pub mod quality;

pub use keyword::{KeywordClassifier, KeywordMatch, contains_any};
pub use mental_health::{AdviceLevel, EmotionRecord, HealthAdvice, HelpResource, MentalHealthMonitor};
pub use moderation::{ActionKind, ContentModerator, ModerationAction, ModerationVerdict};
pub use quality::{ConversationQualityMonitor, QualityAssessment, QualityMetrics, QualityScore};
