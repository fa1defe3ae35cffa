//! Real-time conversation quality scoring.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::classify::keyword::contains_any;
use crate::matching::classify::lexicon::{
    DEPTH_KEYWORDS, SYNC_NEGATIVE_WORDS, SYNC_POSITIVE_WORDS,
};
use crate::matching::core::config::QualityConfig;
use crate::matching::core::message::Message;

/// Raw quality metrics of the last analyzed message, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// How reflective the message is.
    pub topic_depth: f64,
    /// How promptly it answered the previous message.
    pub response_consistency: f64,
    /// Emotional alignment with the previous message.
    pub emotion_sync: f64,
}

/// Quality metrics as integer percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Topic depth, 0-100.
    pub topic_depth: u8,
    /// Response consistency, 0-100.
    pub response_consistency: u8,
    /// Emotion sync, 0-100.
    pub emotion_sync: u8,
    /// Rounded mean of the three raw metrics, 0-100.
    pub overall: u8,
}

impl From<QualityMetrics> for QualityScore {
    fn from(m: QualityMetrics) -> Self {
        Self {
            topic_depth: to_percent(m.topic_depth),
            response_consistency: to_percent(m.response_consistency),
            emotion_sync: to_percent(m.emotion_sync),
            overall: to_percent((m.topic_depth + m.response_consistency + m.emotion_sync) / 3.0),
        }
    }
}

/// Verdict on a whole conversation from its per-message scores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QualityAssessment {
    /// Scores that were averaged.
    pub messages: usize,
    /// Mean of the per-message scores.
    pub average: QualityScore,
    /// Whether the mean overall score is below the low-quality line.
    pub low_quality: bool,
    /// Improvement hints, weakest dimension first.
    pub suggestions: Vec<&'static str>,
}

const DEPTH_HINT: &str = "尝试深入探讨感兴趣的话题，分享更多细节和个人经历";
const CONSISTENCY_HINT: &str = "保持稳定的回应节奏，让对话更加流畅";
const SYNC_HINT: &str = "多关注对方的情绪状态，给予适当的情感回应";
const SWITCH_HINT: &str = "建议尝试其他匹配对象，寻找更合适的交流伙伴";
const WEAK_DIMENSION_PERCENT: u8 = 50;

/// Polarity of a message for emotion sync.
#[derive(Clone, Copy, Debug)]
struct Polarity {
    positive: bool,
    negative: bool,
}

impl Polarity {
    fn of(content: &str) -> Self {
        Self {
            positive: contains_any(content, SYNC_POSITIVE_WORDS),
            negative: contains_any(content, SYNC_NEGATIVE_WORDS),
        }
    }
}

/// Scores each new message against the one before it.
///
/// Only the latest metrics are kept; nothing accumulates across calls.
#[derive(Clone, Debug, Default)]
pub struct ConversationQualityMonitor {
    config: QualityConfig,
    metrics: QualityMetrics,
}

impl ConversationQualityMonitor {
    /// Create a monitor with the given scoring constants.
    #[must_use]
    pub fn new(config: QualityConfig) -> Self {
        Self {
            config,
            metrics: QualityMetrics::default(),
        }
    }

    /// Score `message` given the messages that preceded it, oldest first.
    pub fn analyze_message(&mut self, message: &Message, previous: &[Message]) -> QualityScore {
        let last = previous.last();
        self.metrics = QualityMetrics {
            topic_depth: self.topic_depth(message),
            response_consistency: self.response_consistency(message, last),
            emotion_sync: self.emotion_sync(message, last),
        };

        let score = QualityScore::from(self.metrics);
        debug!(
            depth = score.topic_depth,
            consistency = score.response_consistency,
            sync = score.emotion_sync,
            overall = score.overall,
            "conversation quality scored"
        );
        score
    }

    /// Judge a conversation from its per-message scores, oldest first.
    ///
    /// Returns `None` until `min_messages_for_assessment` scores exist.
    #[must_use]
    pub fn assess(&self, scores: &[QualityScore]) -> Option<QualityAssessment> {
        if scores.is_empty() || scores.len() < self.config.min_messages_for_assessment {
            return None;
        }

        let average = QualityScore {
            topic_depth: mean_percent(scores, |s| s.topic_depth),
            response_consistency: mean_percent(scores, |s| s.response_consistency),
            emotion_sync: mean_percent(scores, |s| s.emotion_sync),
            overall: mean_percent(scores, |s| s.overall),
        };
        let low_quality = average.overall < self.config.low_quality_percent;

        let mut weak: Vec<(u8, &'static str)> = [
            (average.topic_depth, DEPTH_HINT),
            (average.response_consistency, CONSISTENCY_HINT),
            (average.emotion_sync, SYNC_HINT),
        ]
        .into_iter()
        .filter(|(value, _)| *value < WEAK_DIMENSION_PERCENT)
        .collect();
        weak.sort_by_key(|(value, _)| *value);
        let mut suggestions: Vec<&'static str> = weak.into_iter().map(|(_, hint)| hint).collect();
        if low_quality {
            suggestions.push(SWITCH_HINT);
        }

        debug!(
            messages = scores.len(),
            overall = average.overall,
            low_quality,
            "conversation quality assessed"
        );
        Some(QualityAssessment {
            messages: scores.len(),
            average,
            low_quality,
            suggestions,
        })
    }

    /// Raw metrics of the last analysis.
    #[must_use]
    pub const fn metrics(&self) -> QualityMetrics {
        self.metrics
    }

    fn topic_depth(&self, message: &Message) -> f64 {
        let deep = contains_any(&message.content, DEPTH_KEYWORDS)
            && message.char_len() > self.config.depth_min_chars;
        if deep {
            self.config.deep_score
        } else {
            self.config.shallow_score
        }
    }

    fn response_consistency(&self, message: &Message, last: Option<&Message>) -> f64 {
        let Some(last) = last else {
            return self.config.first_message_score;
        };

        let gap_ms = message
            .timestamp
            .signed_duration_since(last.timestamp)
            .num_milliseconds();
        if gap_ms < self.config.response_window_ms {
            self.config.prompt_reply_score
        } else {
            self.config.late_reply_score
        }
    }

    fn emotion_sync(&self, message: &Message, last: Option<&Message>) -> f64 {
        let Some(last) = last else {
            return self.config.neutral_emotion_score;
        };

        let now = Polarity::of(&message.content);
        let before = Polarity::of(&last.content);
        if (now.positive && before.positive) || (now.negative && before.negative) {
            self.config.aligned_emotion_score
        } else if (now.positive && before.negative) || (now.negative && before.positive) {
            self.config.shifted_emotion_score
        } else {
            self.config.neutral_emotion_score
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(value: f64) -> u8 {
    (value * 100.0).round().clamp(0.0, 100.0) as u8
}

#[allow(clippy::cast_precision_loss)]
fn mean_percent(scores: &[QualityScore], field: impl Fn(&QualityScore) -> u8) -> u8 {
    let total: u64 = scores.iter().map(|s| u64::from(field(s))).sum();
    to_percent(total as f64 / scores.len() as f64 / 100.0)
}
