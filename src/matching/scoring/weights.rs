//! Dimension weights for the match score.

use serde::{Deserialize, Serialize};

use crate::matching::core::config::WeightConfig;

/// Non-negative weights of the four match dimensions, summing to one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    /// Personality (MBTI) compatibility.
    pub personality: f64,
    /// Interest overlap.
    pub interest: f64,
    /// Scene relevance.
    pub scene: f64,
    /// Emotional sync.
    pub emotion: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::from(WeightConfig::default())
    }
}

impl From<WeightConfig> for MatchWeights {
    fn from(config: WeightConfig) -> Self {
        Self {
            personality: config.personality,
            interest: config.interest,
            scene: config.scene,
            emotion: config.emotion,
        }
    }
}

impl MatchWeights {
    /// Sum of all four weights.
    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.personality + self.interest + self.scene + self.emotion
    }

    /// Move `step` of weight from personality to interest.
    ///
    /// With `clamp`, personality never drops below zero.
    pub const fn shift_to_interest(&mut self, step: f64, clamp: bool) {
        self.interest += step;
        self.personality -= step;
        if clamp {
            self.personality = self.personality.max(0.0);
        }
    }

    /// Rescale so the weights sum to one. A zero sum is left untouched.
    pub const fn normalize(&mut self) {
        let sum = self.sum();
        if sum <= 0.0 || !sum.is_finite() {
            return;
        }
        self.personality /= sum;
        self.interest /= sum;
        self.scene /= sum;
        self.emotion /= sum;
    }
}
