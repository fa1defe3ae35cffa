//! User profile consumed by match scoring.
//!
//! Real and virtual users share this shape; virtual ones carry `is_virtual`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::matching::core::ids::UserId;
use crate::matching::core::kinds::{InterestCategory, MbtiType, Scene};

/// Big Five trait estimates, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    /// Outgoing vs. reserved.
    pub extraversion: f64,
    /// Friendly vs. critical.
    pub agreeableness: f64,
    /// Organized vs. spontaneous.
    pub conscientiousness: f64,
    /// Sensitive vs. secure.
    pub neuroticism: f64,
    /// Curious vs. cautious.
    pub openness: f64,
}

impl PersonalityTraits {
    /// Neutral prior for every trait.
    pub const NEUTRAL: f64 = 0.5;
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            extraversion: Self::NEUTRAL,
            agreeableness: Self::NEUTRAL,
            conscientiousness: Self::NEUTRAL,
            neuroticism: Self::NEUTRAL,
            openness: Self::NEUTRAL,
        }
    }
}

/// Typical message length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLength {
    /// Long, elaborated messages.
    Detailed,
    /// Short, to-the-point messages.
    Concise,
}

/// Whether the user asks questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interactivity {
    /// Asks questions.
    High,
    /// Rarely asks questions.
    Low,
}

/// Whether the user uses exclamations or emoji.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expressiveness {
    /// Uses exclamations or emoji.
    High,
    /// Plain text.
    Low,
}

/// Communication-style labels derived from a batch of messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunicationStyle {
    /// Average length label.
    pub message_length: MessageLength,
    /// Question-asking label.
    pub interactive: Interactivity,
    /// Emotional expressiveness label.
    pub expressive: Expressiveness,
}

/// Profile of a real or virtual user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier.
    pub user_id: UserId,
    /// Display name.
    pub username: String,
    /// University.
    pub school: Option<String>,
    /// Field of study.
    pub major: Option<String>,
    /// Year of study (1-4).
    pub grade: Option<u8>,
    /// MBTI code, when the user took the assessment.
    pub mbti_type: Option<MbtiType>,
    /// Synthetic candidate generated to fill sparse pools.
    pub is_virtual: bool,
    /// Preferred matching scene.
    pub scene_preference: Option<Scene>,
    /// Interest tags by category; `None` when never collected.
    pub interests: Option<BTreeMap<InterestCategory, Vec<String>>>,
    /// Trait estimates.
    pub personality: PersonalityTraits,
    /// Latest communication-style labels.
    pub communication_style: Option<CommunicationStyle>,
}

impl UserProfile {
    /// Create a profile with no assessment or interest data.
    #[must_use]
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            school: None,
            major: None,
            grade: None,
            mbti_type: None,
            is_virtual: false,
            scene_preference: None,
            interests: None,
            personality: PersonalityTraits::default(),
            communication_style: None,
        }
    }

    /// Set the MBTI type.
    #[must_use]
    pub const fn with_mbti(mut self, mbti_type: MbtiType) -> Self {
        self.mbti_type = Some(mbti_type);
        self
    }

    /// Add interest tags under a category.
    #[must_use]
    pub fn with_interests<I, S>(mut self, category: InterestCategory, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_interests(category, tags);
        self
    }

    /// Merge interest tags into a category, skipping ones already present.
    ///
    /// Returns the number of tags actually added.
    pub fn add_interests<I, S>(&mut self, category: InterestCategory, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bucket = self
            .interests
            .get_or_insert_with(BTreeMap::new)
            .entry(category)
            .or_default();

        let mut added = 0;
        for tag in tags {
            let tag = tag.into();
            if !bucket.contains(&tag) {
                bucket.push(tag);
                added += 1;
            }
        }
        added
    }

    /// Tags from the categories compared during matching.
    ///
    /// Returns `None` when the profile has no interest data at all.
    #[must_use]
    pub fn matchable_interests(&self) -> Option<BTreeSet<&str>> {
        let interests = self.interests.as_ref()?;
        Some(
            InterestCategory::MATCHABLE
                .iter()
                .filter_map(|category| interests.get(category))
                .flatten()
                .map(String::as_str)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_traits_are_neutral() {
        let traits = PersonalityTraits::default();
        assert!((traits.extraversion - 0.5).abs() < f64::EPSILON);
        assert!((traits.openness - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_interests_dedupes() {
        let mut profile = UserProfile::new(UserId::new(), "小明");
        assert_eq!(
            profile.add_interests(InterestCategory::Academic, ["考研", "算法"]),
            2
        );
        assert_eq!(
            profile.add_interests(InterestCategory::Academic, ["考研", "数学"]),
            1
        );
        let academic = &profile.interests.as_ref().unwrap()[&InterestCategory::Academic];
        assert_eq!(academic, &vec!["考研", "算法", "数学"]);
    }

    #[test]
    fn test_matchable_interests_ignores_sports_and_entertainment() {
        let profile = UserProfile::new(UserId::new(), "小红")
            .with_interests(InterestCategory::Academic, ["算法"])
            .with_interests(InterestCategory::Hobby, ["摄影"])
            .with_interests(InterestCategory::Sports, ["篮球"]);
        let tags = profile.matchable_interests().unwrap();
        assert!(tags.contains("算法"));
        assert!(tags.contains("摄影"));
        assert!(!tags.contains("篮球"));
    }

    #[test]
    fn test_matchable_interests_none_without_data() {
        let profile = UserProfile::new(UserId::new(), "小刚");
        assert!(profile.matchable_interests().is_none());
    }
}
