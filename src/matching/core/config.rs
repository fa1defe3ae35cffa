//! Configuration for the matching subsystem.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::matching::core::errors::{MatchError, MatchResult};

/// Tolerance used when checking that weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Top-level configuration for the matching subsystem.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Conversation quality scoring.
    pub quality: QualityConfig,
    /// Mental-health streak detection.
    pub mental_health: MentalHealthConfig,
    /// Profile extraction settings.
    pub profile: ProfileConfig,
    /// Match weight optimization.
    pub optimizer: OptimizerConfig,
    /// Virtual user weighting.
    pub virtual_users: VirtualUserConfig,
    /// Conversation silence detection.
    pub silence: SilenceConfig,
    /// Violation-count penalties.
    pub penalties: PenaltyConfig,
}

impl MatchConfig {
    /// Parse a configuration from JSON; absent sections use defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json_str(raw: &str) -> MatchResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> MatchResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> MatchResult<()> {
        self.quality.validate()?;
        self.mental_health.validate()?;
        self.profile.validate()?;
        self.optimizer.validate()?;
        self.virtual_users.validate()?;
        self.silence.validate()?;
        self.penalties.validate()
    }
}

/// Conversation quality scoring constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// A message must be strictly longer than this (in characters) to count as deep.
    pub depth_min_chars: usize,
    /// Replies within this many milliseconds count as consistent.
    pub response_window_ms: i64,
    /// Topic depth for a long message containing a depth keyword.
    pub deep_score: f64,
    /// Topic depth otherwise.
    pub shallow_score: f64,
    /// Response consistency for the first message of a conversation.
    pub first_message_score: f64,
    /// Response consistency for a prompt reply.
    pub prompt_reply_score: f64,
    /// Response consistency for a late reply.
    pub late_reply_score: f64,
    /// Emotion sync when both messages share a polarity.
    pub aligned_emotion_score: f64,
    /// Emotion sync when polarity flips between messages.
    pub shifted_emotion_score: f64,
    /// Emotion sync in every other case.
    pub neutral_emotion_score: f64,
    /// Average overall percentage below which a conversation is low quality.
    pub low_quality_percent: u8,
    /// Messages required before a conversation is assessed at all.
    pub min_messages_for_assessment: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            depth_min_chars: 20,
            response_window_ms: 300_000,
            deep_score: 0.8,
            shallow_score: 0.5,
            first_message_score: 0.7,
            prompt_reply_score: 0.8,
            late_reply_score: 0.5,
            aligned_emotion_score: 0.9,
            shifted_emotion_score: 0.6,
            neutral_emotion_score: 0.7,
            low_quality_percent: 50,
            min_messages_for_assessment: 10,
        }
    }
}

impl QualityConfig {
    pub(crate) fn validate(&self) -> MatchResult<()> {
        if self.response_window_ms <= 0 {
            return Err(MatchError::InvalidConfig(
                "quality.response_window_ms must be > 0".to_string(),
            ));
        }

        let scores = [
            ("deep_score", self.deep_score),
            ("shallow_score", self.shallow_score),
            ("first_message_score", self.first_message_score),
            ("prompt_reply_score", self.prompt_reply_score),
            ("late_reply_score", self.late_reply_score),
            ("aligned_emotion_score", self.aligned_emotion_score),
            ("shifted_emotion_score", self.shifted_emotion_score),
            ("neutral_emotion_score", self.neutral_emotion_score),
        ];
        for (name, value) in scores {
            ensure_unit_interval(&format!("quality.{name}"), value)?;
        }

        if self.low_quality_percent > 100 {
            return Err(MatchError::InvalidConfig(
                "quality.low_quality_percent must be <= 100".to_string(),
            ));
        }

        if self.min_messages_for_assessment == 0 {
            return Err(MatchError::InvalidConfig(
                "quality.min_messages_for_assessment must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Persistent low-mood detection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentalHealthConfig {
    /// Number of most recent records inspected.
    pub window: usize,
    /// Minimum distressed records within the window to raise a flag.
    pub negative_threshold: usize,
}

impl Default for MentalHealthConfig {
    fn default() -> Self {
        Self {
            window: 5,
            negative_threshold: 3,
        }
    }
}

impl MentalHealthConfig {
    pub(crate) fn validate(&self) -> MatchResult<()> {
        if self.window == 0 {
            return Err(MatchError::InvalidConfig(
                "mental_health.window must be > 0".to_string(),
            ));
        }

        if self.negative_threshold == 0 || self.negative_threshold > self.window {
            return Err(MatchError::InvalidConfig(format!(
                "mental_health.negative_threshold must be in 1..={}",
                self.window
            )));
        }

        Ok(())
    }
}

/// Profile extraction settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Average message length above which the style is `detailed`.
    pub detailed_min_avg_chars: f64,
    /// Default limit for top-interest queries.
    pub top_interests_default: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            detailed_min_avg_chars: 50.0,
            top_interests_default: 10,
        }
    }
}

impl ProfileConfig {
    pub(crate) fn validate(&self) -> MatchResult<()> {
        if !self.detailed_min_avg_chars.is_finite() || self.detailed_min_avg_chars < 0.0 {
            return Err(MatchError::InvalidConfig(
                "profile.detailed_min_avg_chars must be a non-negative number".to_string(),
            ));
        }

        if self.top_interests_default == 0 {
            return Err(MatchError::InvalidConfig(
                "profile.top_interests_default must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Initial weights for the four match dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Personality (MBTI) compatibility.
    pub personality: f64,
    /// Interest overlap.
    pub interest: f64,
    /// Scene relevance.
    pub scene: f64,
    /// Emotional sync.
    pub emotion: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            personality: 0.25,
            interest: 0.30,
            scene: 0.25,
            emotion: 0.20,
        }
    }
}

/// Feedback-driven weight optimization settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Weights the optimizer starts from.
    pub initial_weights: WeightConfig,
    /// Re-optimize every N feedback records.
    pub optimize_every: usize,
    /// Number of most recent feedback records considered.
    pub feedback_window: usize,
    /// Positive rate below which weights shift toward interest.
    pub success_threshold: f64,
    /// Amount moved from personality to interest per adjustment.
    pub weight_step: f64,
    /// Clamp weights at zero before re-normalizing.
    pub clamp_non_negative: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            initial_weights: WeightConfig::default(),
            optimize_every: 10,
            feedback_window: 50,
            success_threshold: 0.6,
            weight_step: 0.05,
            clamp_non_negative: true,
        }
    }
}

impl OptimizerConfig {
    pub(crate) fn validate(&self) -> MatchResult<()> {
        let w = self.initial_weights;
        for (name, value) in [
            ("personality", w.personality),
            ("interest", w.interest),
            ("scene", w.scene),
            ("emotion", w.emotion),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "optimizer.initial_weights.{name} must be >= 0"
                )));
            }
        }

        let sum = w.personality + w.interest + w.scene + w.emotion;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchError::InvalidConfig(format!(
                "optimizer.initial_weights must sum to 1.0 (got {sum})"
            )));
        }

        if self.optimize_every == 0 {
            return Err(MatchError::InvalidConfig(
                "optimizer.optimize_every must be > 0".to_string(),
            ));
        }

        if self.feedback_window == 0 {
            return Err(MatchError::InvalidConfig(
                "optimizer.feedback_window must be > 0".to_string(),
            ));
        }

        ensure_unit_interval("optimizer.success_threshold", self.success_threshold)?;
        ensure_unit_interval("optimizer.weight_step", self.weight_step)
    }
}

/// Virtual user weighting by real-user population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualUserConfig {
    /// `(population_below, weight)` tiers in ascending population order.
    pub tiers: Vec<(u64, f64)>,
    /// Weight once the population exceeds every tier.
    pub floor_weight: f64,
}

impl Default for VirtualUserConfig {
    fn default() -> Self {
        Self {
            tiers: vec![(100, 1.0), (500, 0.5), (1000, 0.2)],
            floor_weight: 0.1,
        }
    }
}

impl VirtualUserConfig {
    /// Weight for virtual candidates given the real-user population.
    #[must_use]
    pub fn weight_for(&self, real_user_count: u64) -> f64 {
        self.tiers
            .iter()
            .find(|(below, _)| real_user_count < *below)
            .map_or(self.floor_weight, |(_, weight)| *weight)
    }

    pub(crate) fn validate(&self) -> MatchResult<()> {
        if self
            .tiers
            .windows(2)
            .any(|pair| pair[0].0 >= pair[1].0)
        {
            return Err(MatchError::InvalidConfig(
                "virtual_users.tiers must be strictly ascending".to_string(),
            ));
        }

        for (_, weight) in &self.tiers {
            ensure_unit_interval("virtual_users.tiers weight", *weight)?;
        }

        ensure_unit_interval("virtual_users.floor_weight", self.floor_weight)
    }
}

/// When a quiet conversation gets an assistant topic prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceConfig {
    /// Milliseconds without a message before the conversation counts as silent.
    pub idle_after_ms: i64,
    /// Messages shorter than this many characters count as short.
    pub short_message_chars: usize,
    /// Consecutive short messages that count as silence.
    pub short_message_run: usize,
    /// Messages inspected when guessing why the conversation went quiet.
    pub emotion_window: usize,
    /// Minimum milliseconds between two prompts in one conversation.
    pub cooldown_ms: i64,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            idle_after_ms: 30_000,
            short_message_chars: 30,
            short_message_run: 3,
            emotion_window: 10,
            cooldown_ms: 20 * 60 * 1000,
        }
    }
}

impl SilenceConfig {
    pub(crate) fn validate(&self) -> MatchResult<()> {
        if self.idle_after_ms <= 0 {
            return Err(MatchError::InvalidConfig(
                "silence.idle_after_ms must be > 0".to_string(),
            ));
        }

        if self.short_message_run == 0 || self.emotion_window == 0 {
            return Err(MatchError::InvalidConfig(
                "silence.short_message_run and silence.emotion_window must be > 0".to_string(),
            ));
        }

        if self.cooldown_ms < 0 {
            return Err(MatchError::InvalidConfig(
                "silence.cooldown_ms must be >= 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Violation counts at which a penalty is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Violations that earn a warning.
    pub warning_at: usize,
    /// Violations that earn a one-day mute.
    pub mute_at: usize,
    /// Violations that earn a seven-day suspension.
    pub suspend_at: usize,
    /// Violations that earn a permanent ban.
    pub ban_at: usize,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            warning_at: 1,
            mute_at: 3,
            suspend_at: 5,
            ban_at: 10,
        }
    }
}

impl PenaltyConfig {
    pub(crate) fn validate(&self) -> MatchResult<()> {
        let ascending = 0 < self.warning_at
            && self.warning_at < self.mute_at
            && self.mute_at < self.suspend_at
            && self.suspend_at < self.ban_at;
        if ascending {
            Ok(())
        } else {
            Err(MatchError::InvalidConfig(
                "penalties thresholds must be > 0 and strictly ascending".to_string(),
            ))
        }
    }
}

fn ensure_unit_interval(name: &str, value: f64) -> MatchResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MatchError::InvalidConfig(format!(
            "{name} must be within [0, 1] (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            MatchConfig::from_json_str(r#"{ "mental_health": { "window": 7 } }"#).unwrap();
        assert_eq!(config.mental_health.window, 7);
        assert_eq!(config.mental_health.negative_threshold, 3);
        assert_eq!(config.optimizer.optimize_every, 10);
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let mut config = MatchConfig::default();
        config.optimizer.initial_weights.emotion = 0.5;
        assert!(matches!(
            config.validate(),
            Err(MatchError::InvalidConfig(msg)) if msg.contains("sum to 1.0")
        ));
    }

    #[test]
    fn test_rejects_threshold_above_window() {
        let mut config = MatchConfig::default();
        config.mental_health.negative_threshold = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unsorted_tiers() {
        let mut config = MatchConfig::default();
        config.virtual_users.tiers = vec![(500, 0.5), (100, 1.0)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            MatchConfig::from_json_str("{ nope"),
            Err(MatchError::Serialization(_))
        ));
    }

    #[test]
    fn test_section_validators_reject_zero_counts() {
        let optimizer = OptimizerConfig {
            optimize_every: 0,
            ..OptimizerConfig::default()
        };
        assert!(optimizer.validate().is_err());

        let silence = SilenceConfig {
            short_message_run: 0,
            ..SilenceConfig::default()
        };
        assert!(silence.validate().is_err());

        let quality = QualityConfig {
            min_messages_for_assessment: 0,
            ..QualityConfig::default()
        };
        assert!(quality.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_penalty_thresholds() {
        let mut config = MatchConfig::default();
        config.penalties.mute_at = 1;
        assert!(matches!(
            config.validate(),
            Err(MatchError::InvalidConfig(msg)) if msg.contains("ascending")
        ));
    }

    #[test]
    fn test_virtual_weight_tiers() {
        let config = VirtualUserConfig::default();
        assert!((config.weight_for(0) - 1.0).abs() < f64::EPSILON);
        assert!((config.weight_for(99) - 1.0).abs() < f64::EPSILON);
        assert!((config.weight_for(100) - 0.5).abs() < f64::EPSILON);
        assert!((config.weight_for(499) - 0.5).abs() < f64::EPSILON);
        assert!((config.weight_for(500) - 0.2).abs() < f64::EPSILON);
        assert!((config.weight_for(999) - 0.2).abs() < f64::EPSILON);
        assert!((config.weight_for(1000) - 0.1).abs() < f64::EPSILON);
    }
}
