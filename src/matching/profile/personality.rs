//! Big Five trait estimates from a user's own messages.
//!
//! Only extraversion, agreeableness and conscientiousness are estimated;
//! neuroticism and openness stay at the neutral prior.

use serde::Serialize;

use crate::matching::classify::keyword::contains_any;
use crate::matching::classify::lexicon::{AGREEABLE_WORDS, PLANNING_WORDS};
use crate::matching::core::ids::UserId;
use crate::matching::core::message::{Message, average_length_for};
use crate::matching::core::user_profile::PersonalityTraits;

/// Prose summary of a user's personality and writing style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileDescription {
    /// Introversion/extraversion bucket.
    pub personality: &'static str,
    /// Message-length bucket, mentioning the average length.
    pub communication: String,
    /// Rounded average message length in characters (0 when no messages).
    pub avg_length: u32,
}

/// Keyword-based personality estimator.
#[derive(Clone, Copy, Debug, Default)]
pub struct PersonalityAnalyzer;

impl PersonalityAnalyzer {
    /// Estimate traits from the messages `user_id` sent.
    ///
    /// Returns the neutral prior when the user sent nothing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn analyze(&self, messages: &[Message], user_id: UserId) -> PersonalityTraits {
        let mut traits = PersonalityTraits::default();

        let own: Vec<&Message> = messages.iter().filter(|m| m.sender_id == user_id).collect();
        let Some(avg_length) = average_length_for(messages, user_id) else {
            return traits;
        };
        let total = own.len() as f64;

        traits.extraversion = (avg_length / 100.0).min(1.0);

        let agreeable = own
            .iter()
            .filter(|m| contains_any(&m.content, AGREEABLE_WORDS))
            .count() as f64;
        traits.agreeableness = (agreeable / total * 2.0).min(1.0);

        let planning = own
            .iter()
            .filter(|m| contains_any(&m.content, PLANNING_WORDS))
            .count() as f64;
        traits.conscientiousness = (planning / total * 2.0).min(1.0);

        traits
    }

    /// Map traits and average message length to descriptive buckets.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn describe(
        &self,
        traits: &PersonalityTraits,
        messages: &[Message],
        user_id: UserId,
    ) -> ProfileDescription {
        let avg_length = average_length_for(messages, user_id).map_or(0, |avg| avg.round() as u32);

        let personality = if traits.extraversion < 0.4 {
            "你是一个内向但富有创造力的人，在对话中表现出较强的同理心和倾听能力。"
        } else if traits.extraversion > 0.6 {
            "你是一个外向且善于表达的人，在对话中表现出积极主动的态度。"
        } else {
            "你的性格介于内向和外向之间，能够灵活适应不同的社交场合。"
        };

        let communication = if avg_length > 60 {
            format!(
                "你的表达方式细腻且富有情感，平均消息长度较长（约{avg_length}字），说明你倾向于详细阐述自己的想法。"
            )
        } else if avg_length < 30 {
            format!(
                "你的表达简洁明了，平均消息长度较短（约{avg_length}字），倾向于直接表达核心观点。"
            )
        } else {
            format!("你的表达方式适中，平均消息长度约{avg_length}字，能够清晰传达想法。")
        };

        ProfileDescription {
            personality,
            communication,
            avg_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn from(user: UserId, texts: &[&str]) -> Vec<Message> {
        texts
            .iter()
            .map(|t| Message::new(user, *t, Utc::now()))
            .collect()
    }

    #[test]
    fn test_no_messages_keeps_prior() {
        let traits = PersonalityAnalyzer.analyze(&[], UserId::new());
        assert_eq!(traits, PersonalityTraits::default());
    }

    #[test]
    fn test_other_users_messages_ignored() {
        let me = UserId::new();
        let messages = from(UserId::new(), &["谢谢，计划很好"]);
        assert_eq!(
            PersonalityAnalyzer.analyze(&messages, me),
            PersonalityTraits::default()
        );
    }

    #[test]
    fn test_trait_formulas() {
        let me = UserId::new();
        let mut messages = from(me, &["谢谢你", "我在准备考试", "今天下雨", "嗯"]);
        messages.extend(from(UserId::new(), &["好的好的好的"]));
        let traits = PersonalityAnalyzer.analyze(&messages, me);

        // (3 + 6 + 4 + 1) / 4 = 3.5 chars on average
        assert!((traits.extraversion - 0.035).abs() < 1e-9);
        assert!((traits.agreeableness - 0.5).abs() < 1e-9);
        assert!((traits.conscientiousness - 0.5).abs() < 1e-9);
        assert!((traits.neuroticism - 0.5).abs() < f64::EPSILON);
        assert!((traits.openness - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_traits_capped_at_one() {
        let me = UserId::new();
        let long = "学习计划".repeat(60);
        let messages = from(me, &[long.as_str(), "谢谢，好的"]);
        let traits = PersonalityAnalyzer.analyze(&messages, me);
        assert!((traits.extraversion - 1.0).abs() < f64::EPSILON);
        assert!((traits.agreeableness - 1.0).abs() < f64::EPSILON);
        assert!((traits.conscientiousness - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_describe_buckets() {
        let me = UserId::new();
        let short = from(me, &["嗯嗯"]);
        let traits = PersonalityAnalyzer.analyze(&short, me);
        let description = PersonalityAnalyzer.describe(&traits, &short, me);
        assert_eq!(description.avg_length, 2);
        assert!(description.personality.contains("内向"));
        assert!(description.communication.contains("简洁明了"));

        let long_text = "a".repeat(70);
        let long = from(me, &[long_text.as_str()]);
        let traits = PersonalityAnalyzer.analyze(&long, me);
        let description = PersonalityAnalyzer.describe(&traits, &long, me);
        assert!(description.personality.contains("外向且善于表达"));
        assert!(description.communication.contains("约70字"));

        let mid_text = "a".repeat(45);
        let mid = from(me, &[mid_text.as_str()]);
        let traits = PersonalityAnalyzer.analyze(&mid, me);
        let description = PersonalityAnalyzer.describe(&traits, &mid, me);
        assert!(description.personality.contains("介于内向和外向之间"));
        assert!(description.communication.contains("适中"));
    }

    #[test]
    fn test_describe_without_messages() {
        let description =
            PersonalityAnalyzer.describe(&PersonalityTraits::default(), &[], UserId::new());
        assert_eq!(description.avg_length, 0);
        assert!(description.communication.contains("简洁明了"));
    }
}
