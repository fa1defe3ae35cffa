//! Per-dimension compatibility sub-scores, each in `[0, 1]`.

use crate::matching::core::kinds::{MbtiType, Scene};
use crate::matching::core::user_profile::UserProfile;

/// Sub-score when neither rule applies or data is missing.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Sub-score when B's type is in A's compatible list.
pub const COMPATIBLE_TYPE_SCORE: f64 = 0.9;
/// Sub-score when both users share a type.
pub const SAME_TYPE_SCORE: f64 = 0.7;

/// Scene and emotion compatibility between two users.
///
/// Swap implementations to replace the constant placeholders with a real
/// model; results must stay within `[0, 1]`.
pub trait CompatibilityModel: Send + Sync {
    /// How well the pair fits the given scene.
    fn scene_score(&self, a: &UserProfile, b: &UserProfile, scene: Scene) -> f64;

    /// How emotionally in sync the pair is.
    fn emotion_score(&self, a: &UserProfile, b: &UserProfile) -> f64;
}

/// Fixed scene and emotion scores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantCompatibility {
    /// Returned for every scene.
    pub scene: f64,
    /// Returned for every pair.
    pub emotion: f64,
}

impl Default for ConstantCompatibility {
    fn default() -> Self {
        Self {
            scene: 0.8,
            emotion: 0.75,
        }
    }
}

impl CompatibilityModel for ConstantCompatibility {
    fn scene_score(&self, _a: &UserProfile, _b: &UserProfile, _scene: Scene) -> f64 {
        self.scene
    }

    fn emotion_score(&self, _a: &UserProfile, _b: &UserProfile) -> f64 {
        self.emotion
    }
}

/// Types considered compatible with `mbti`. Only four types have entries,
/// and the table is not symmetric.
const fn compatible_types(mbti: MbtiType) -> &'static [MbtiType] {
    use MbtiType::{Enfj, Enfp, Entj, Entp, Infj, Infp, Intj, Intp};
    match mbti {
        Infp => &[Enfj, Entj, Infj, Intj],
        Intj => &[Enfp, Entp, Infp, Intp],
        Enfp => &[Intj, Infj, Entj, Enfj],
        Infj => &[Enfp, Entp, Infp, Intj],
        _ => &[],
    }
}

/// MBTI compatibility of B from A's point of view.
///
/// Missing types on either side score neutral.
#[must_use]
pub fn personality_score(a: Option<MbtiType>, b: Option<MbtiType>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return NEUTRAL_SCORE;
    };

    if compatible_types(a).contains(&b) {
        COMPATIBLE_TYPE_SCORE
    } else if a == b {
        SAME_TYPE_SCORE
    } else {
        NEUTRAL_SCORE
    }
}

/// Overlap of academic, career and hobby tags: `|A ∩ B| / |A ∪ B|`.
///
/// Neutral when either side has no interest data or no tags.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interest_score(a: &UserProfile, b: &UserProfile) -> f64 {
    let (Some(tags_a), Some(tags_b)) = (a.matchable_interests(), b.matchable_interests()) else {
        return NEUTRAL_SCORE;
    };
    if tags_a.is_empty() || tags_b.is_empty() {
        return NEUTRAL_SCORE;
    }

    let common = tags_a.intersection(&tags_b).count();
    let total = tags_a.union(&tags_b).count();
    common as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::core::ids::UserId;
    use crate::matching::core::kinds::InterestCategory;

    fn with_tags(academic: &[&str], hobby: &[&str]) -> UserProfile {
        UserProfile::new(UserId::new(), "u")
            .with_interests(InterestCategory::Academic, academic.iter().copied())
            .with_interests(InterestCategory::Hobby, hobby.iter().copied())
    }

    #[test]
    fn test_compatible_pairs() {
        assert!(
            (personality_score(Some(MbtiType::Infp), Some(MbtiType::Enfj)) - 0.9).abs()
                < f64::EPSILON
        );
        assert!(
            (personality_score(Some(MbtiType::Infj), Some(MbtiType::Intj)) - 0.9).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_table_is_asymmetric() {
        // ENFJ has no entry, so the reverse direction is neutral.
        assert!(
            (personality_score(Some(MbtiType::Enfj), Some(MbtiType::Infp)) - 0.5).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_same_type_and_unlisted_pairs() {
        for &a in MbtiType::ALL {
            for &b in MbtiType::ALL {
                if compatible_types(a).contains(&b) {
                    continue;
                }
                let expected = if a == b { 0.7 } else { 0.5 };
                assert!(
                    (personality_score(Some(a), Some(b)) - expected).abs() < f64::EPSILON,
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_missing_type_is_neutral() {
        assert!((personality_score(None, None) - 0.5).abs() < f64::EPSILON);
        assert!((personality_score(Some(MbtiType::Infp), None) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interest_overlap_ratio() {
        let a = with_tags(&["考研", "算法"], &["音乐"]);
        let b = with_tags(&["算法"], &["音乐", "电影"]);
        // common {算法, 音乐}, union {考研, 算法, 音乐, 电影}
        assert!((interest_score(&a, &b) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interest_defaults() {
        let none = UserProfile::new(UserId::new(), "none");
        let empty = with_tags(&[], &[]);
        let some = with_tags(&["算法"], &[]);
        assert!((interest_score(&none, &some) - 0.5).abs() < f64::EPSILON);
        assert!((interest_score(&empty, &some) - 0.5).abs() < f64::EPSILON);

        let disjoint = with_tags(&["数学"], &[]);
        assert!(interest_score(&some, &disjoint).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sports_tags_ignored() {
        let a = UserProfile::new(UserId::new(), "a")
            .with_interests(InterestCategory::Sports, ["篮球"]);
        let b = with_tags(&["算法"], &[]);
        assert!((interest_score(&a, &b) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_constant_model() {
        let model = ConstantCompatibility::default();
        let a = UserProfile::new(UserId::new(), "a");
        let b = UserProfile::new(UserId::new(), "b");
        assert!((model.scene_score(&a, &b, Scene::Study) - 0.8).abs() < f64::EPSILON);
        assert!((model.emotion_score(&a, &b) - 0.75).abs() < f64::EPSILON);
    }
}
