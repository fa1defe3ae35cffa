//! Weighted match scoring with feedback-driven weight adaptation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::matching::core::config::OptimizerConfig;
use crate::matching::core::errors::MatchResult;
use crate::matching::core::ids::{MatchId, UserId};
use crate::matching::core::kinds::{FeedbackKind, Scene};
use crate::matching::core::user_profile::UserProfile;
use crate::matching::scoring::compatibility::{
    CompatibilityModel, ConstantCompatibility, interest_score, personality_score,
};
use crate::matching::scoring::feedback::{FeedbackRecord, positive_rate};
use crate::matching::scoring::weights::MatchWeights;

/// Per-dimension breakdown of a match score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Personality sub-score in `[0, 1]`.
    pub personality: f64,
    /// Interest sub-score in `[0, 1]`.
    pub interest: f64,
    /// Scene sub-score in `[0, 1]`.
    pub scene: f64,
    /// Emotion sub-score in `[0, 1]`.
    pub emotion: f64,
    /// Weighted total in `[0, 100]`.
    pub total: f64,
}

impl MatchScore {
    /// Sub-scores as rounded percentages: personality, interest, scene, emotion.
    #[must_use]
    pub fn dimension_percents(&self) -> [u8; 4] {
        [
            to_percent(self.personality * 100.0),
            to_percent(self.interest * 100.0),
            to_percent(self.scene * 100.0),
            to_percent(self.emotion * 100.0),
        ]
    }

    /// Total rounded to an integer percentage.
    #[must_use]
    pub fn total_percent(&self) -> u8 {
        to_percent(self.total)
    }
}

/// Scores user pairs and adapts its weights from match feedback.
pub struct MatchingOptimizer {
    config: OptimizerConfig,
    weights: MatchWeights,
    feedback: Vec<FeedbackRecord>,
    model: Box<dyn CompatibilityModel + Send + Sync>,
}

impl fmt::Debug for MatchingOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingOptimizer")
            .field("weights", &self.weights)
            .field("feedback", &self.feedback.len())
            .finish_non_exhaustive()
    }
}

impl Default for MatchingOptimizer {
    fn default() -> Self {
        // default config is valid
        Self::build(
            OptimizerConfig::default(),
            Box::new(ConstantCompatibility::default()),
        )
    }
}

impl MatchingOptimizer {
    /// Create an optimizer using constant scene and emotion scores.
    ///
    /// # Errors
    /// Returns `MatchError::InvalidConfig` if the configuration fails validation.
    pub fn new(config: OptimizerConfig) -> MatchResult<Self> {
        Self::with_model(config, Box::new(ConstantCompatibility::default()))
    }

    /// Create an optimizer with a custom scene/emotion model.
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation.
    pub fn with_model(
        config: OptimizerConfig,
        model: Box<dyn CompatibilityModel + Send + Sync>,
    ) -> MatchResult<Self> {
        config.validate()?;
        Ok(Self::build(config, model))
    }

    fn build(config: OptimizerConfig, model: Box<dyn CompatibilityModel + Send + Sync>) -> Self {
        Self {
            weights: MatchWeights::from(config.initial_weights),
            config,
            feedback: Vec::new(),
            model,
        }
    }

    /// Current dimension weights.
    #[must_use]
    pub const fn weights(&self) -> MatchWeights {
        self.weights
    }

    /// Feedback collected so far, oldest first.
    #[must_use]
    pub fn feedback(&self) -> &[FeedbackRecord] {
        &self.feedback
    }

    /// Match score of `b` for `a` in `scene`, in `[0, 100]`.
    #[must_use]
    pub fn calculate_match_score(&self, a: &UserProfile, b: &UserProfile, scene: Scene) -> f64 {
        self.score_breakdown(a, b, scene).total
    }

    /// Sub-scores and weighted total for a pair.
    #[must_use]
    pub fn score_breakdown(&self, a: &UserProfile, b: &UserProfile, scene: Scene) -> MatchScore {
        let personality = personality_score(a.mbti_type, b.mbti_type);
        let interest = interest_score(a, b);
        let scene_score = self.model.scene_score(a, b, scene).clamp(0.0, 1.0);
        let emotion = self.model.emotion_score(a, b).clamp(0.0, 1.0);

        let w = &self.weights;
        let weighted = w.emotion.mul_add(
            emotion,
            w.scene.mul_add(
                scene_score,
                w.interest.mul_add(interest, w.personality * personality),
            ),
        );

        MatchScore {
            personality,
            interest,
            scene: scene_score,
            emotion,
            total: (weighted * 100.0).clamp(0.0, 100.0),
        }
    }

    /// Record feedback on a match.
    ///
    /// Every `optimize_every`-th record triggers [`Self::optimize_weights`];
    /// the new weights are returned when that happens.
    pub fn collect_feedback(
        &mut self,
        match_id: MatchId,
        user_id: UserId,
        feedback: FeedbackKind,
    ) -> Option<MatchWeights> {
        self.feedback
            .push(FeedbackRecord::new(match_id, user_id, feedback));
        debug!(%match_id, %user_id, %feedback, total = self.feedback.len(), "feedback recorded");

        if self
            .feedback
            .len()
            .checked_rem(self.config.optimize_every)
            == Some(0)
        {
            self.optimize_weights();
            Some(self.weights)
        } else {
            None
        }
    }

    /// Shift weight from personality to interest when recent feedback is poor.
    ///
    /// Looks at the most recent `feedback_window` records. Weights are
    /// renormalized to sum to one afterwards.
    pub fn optimize_weights(&mut self) {
        let start = self
            .feedback
            .len()
            .saturating_sub(self.config.feedback_window);
        let Some(rate) = positive_rate(&self.feedback[start..]) else {
            return;
        };

        let before = self.weights;
        if rate < self.config.success_threshold {
            self.weights
                .shift_to_interest(self.config.weight_step, self.config.clamp_non_negative);
        }
        self.weights.normalize();

        info!(
            positive_rate = rate,
            old = ?before,
            personality = self.weights.personality,
            interest = self.weights.interest,
            scene = self.weights.scene,
            emotion = self.weights.emotion,
            "match weights optimized"
        );
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
