//! Folds conversation batches into profile updates.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::matching::classify::keyword::contains_any;
use crate::matching::classify::lexicon::{EXPRESSIVE_PATTERN, QUESTION_MARKS};
use crate::matching::core::config::ProfileConfig;
use crate::matching::core::errors::MatchResult;
use crate::matching::core::ids::UserId;
use crate::matching::core::kinds::InterestCategory;
use crate::matching::core::message::{Message, average_length_for};
use crate::matching::core::user_profile::{
    CommunicationStyle, Expressiveness, Interactivity, MessageLength, PersonalityTraits,
    UserProfile,
};
use crate::matching::profile::interests::{InterestCount, InterestExtractor};
use crate::matching::profile::personality::PersonalityAnalyzer;

/// Information derived from one batch of messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// Interest keywords found in the batch, de-duplicated, first mention first.
    pub new_interests: Vec<String>,
    /// The same keywords grouped by category.
    pub interests_by_category: BTreeMap<InterestCategory, Vec<String>>,
    /// Style of the user's own messages; `None` when the user sent nothing.
    pub communication_style: Option<CommunicationStyle>,
}

impl ProfileUpdate {
    /// Merge the update into a stored profile.
    ///
    /// Interests accumulate without duplicates; the style is replaced when
    /// the batch produced one. Returns the number of new interest tags.
    pub fn merge_into(&self, profile: &mut UserProfile) -> usize {
        let added = self
            .interests_by_category
            .iter()
            .map(|(category, tags)| profile.add_interests(*category, tags.iter().cloned()))
            .sum();

        if let Some(style) = self.communication_style {
            profile.communication_style = Some(style);
        }

        added
    }
}

/// Derives interests, communication style and traits from messages.
#[derive(Clone, Debug)]
pub struct ProfileUpdater {
    config: ProfileConfig,
    interests: InterestExtractor,
    analyzer: PersonalityAnalyzer,
    expressive: Regex,
}

impl ProfileUpdater {
    /// Create an updater.
    ///
    /// # Errors
    /// Returns an error if the built-in expressiveness pattern fails to compile.
    pub fn new(config: ProfileConfig) -> MatchResult<Self> {
        Ok(Self {
            config,
            interests: InterestExtractor::new(),
            analyzer: PersonalityAnalyzer,
            expressive: Regex::new(EXPRESSIVE_PATTERN)?,
        })
    }

    /// Extract interests from every message and the style of `user_id`'s messages.
    ///
    /// Computed fresh from this batch; merging into a stored profile is
    /// [`ProfileUpdate::merge_into`]'s job.
    pub fn extract_info(&mut self, messages: &[Message], user_id: UserId) -> ProfileUpdate {
        let mut update = ProfileUpdate::default();

        for message in messages {
            for keyword in self.interests.extract(&message.content) {
                if !update.new_interests.iter().any(|seen| seen == keyword) {
                    update.new_interests.push(keyword.to_string());
                }
            }

            for (category, keywords) in self.interests.categorize(&message.content) {
                let bucket = update.interests_by_category.entry(category).or_default();
                for keyword in keywords {
                    if !bucket.iter().any(|seen| seen == keyword) {
                        bucket.push(keyword.to_string());
                    }
                }
            }
        }

        update.communication_style = self.communication_style(messages, user_id);

        if !update.new_interests.is_empty() {
            debug!(user = %user_id, interests = ?update.new_interests, "new interests found");
        }

        update
    }

    /// Communication-style labels of the messages `user_id` sent.
    #[must_use]
    pub fn communication_style(
        &self,
        messages: &[Message],
        user_id: UserId,
    ) -> Option<CommunicationStyle> {
        let avg_length = average_length_for(messages, user_id)?;
        let own = || messages.iter().filter(|m| m.sender_id == user_id);

        let message_length = if avg_length > self.config.detailed_min_avg_chars {
            MessageLength::Detailed
        } else {
            MessageLength::Concise
        };
        let interactive = if own().any(|m| contains_any(&m.content, QUESTION_MARKS)) {
            Interactivity::High
        } else {
            Interactivity::Low
        };
        let expressive = if own().any(|m| self.expressive.is_match(&m.content)) {
            Expressiveness::High
        } else {
            Expressiveness::Low
        };

        Some(CommunicationStyle {
            message_length,
            interactive,
            expressive,
        })
    }

    /// Trait estimates for `user_id`.
    #[must_use]
    pub fn personality(&self, messages: &[Message], user_id: UserId) -> PersonalityTraits {
        self.analyzer.analyze(messages, user_id)
    }

    /// Most mentioned interests over the updater's lifetime.
    ///
    /// Uses the configured default limit when `limit` is `None`.
    #[must_use]
    pub fn top_interests(&self, limit: Option<usize>) -> Vec<InterestCount> {
        self.interests
            .top_interests(limit.unwrap_or(self.config.top_interests_default))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn updater() -> ProfileUpdater {
        ProfileUpdater::new(ProfileConfig::default()).unwrap()
    }

    fn msg(user: UserId, text: &str) -> Message {
        Message::new(user, text, Utc::now())
    }

    #[test]
    fn test_new_interests_deduplicated() {
        let me = UserId::new();
        let mut updater = updater();
        let update = updater.extract_info(
            &[msg(me, "我喜欢音乐和电影"), msg(me, "最近在准备考研，也听音乐")],
            me,
        );
        assert_eq!(update.new_interests, vec!["音乐", "电影", "考研"]);
        assert_eq!(
            update.interests_by_category[&InterestCategory::Entertainment],
            vec!["电影", "音乐"]
        );
    }

    #[test]
    fn test_interests_include_other_senders() {
        let me = UserId::new();
        let mut updater = updater();
        let update = updater.extract_info(&[msg(UserId::new(), "一起去游泳吧")], me);
        assert_eq!(update.new_interests, vec!["游泳"]);
        assert!(update.communication_style.is_none());
    }

    #[test]
    fn test_communication_style_labels() {
        let me = UserId::new();
        let updater = updater();
        let concise = updater
            .communication_style(&[msg(me, "好的"), msg(me, "明天见")], me)
            .unwrap();
        assert_eq!(concise.message_length, MessageLength::Concise);
        assert_eq!(concise.interactive, Interactivity::Low);
        assert_eq!(concise.expressive, Expressiveness::Low);

        let chatty = "a".repeat(51);
        let style = updater
            .communication_style(&[msg(me, &chatty), msg(me, "你呢？"), msg(me, "太好了😊")], me)
            .unwrap();
        assert_eq!(style.interactive, Interactivity::High);
        assert_eq!(style.expressive, Expressiveness::High);
    }

    #[test]
    fn test_detailed_threshold_is_strict() {
        let me = UserId::new();
        let updater = updater();
        let fifty = "a".repeat(50);
        let style = updater.communication_style(&[msg(me, &fifty)], me).unwrap();
        assert_eq!(style.message_length, MessageLength::Concise);
        let fifty_one = "a".repeat(51);
        let style = updater
            .communication_style(&[msg(me, &fifty_one)], me)
            .unwrap();
        assert_eq!(style.message_length, MessageLength::Detailed);
    }

    #[test]
    fn test_half_width_marks_count() {
        let me = UserId::new();
        let style = updater()
            .communication_style(&[msg(me, "really?"), msg(me, "wow!")], me)
            .unwrap();
        assert_eq!(style.interactive, Interactivity::High);
        assert_eq!(style.expressive, Expressiveness::High);
    }

    #[test]
    fn test_merge_into_profile_accumulates() {
        let me = UserId::new();
        let mut updater = updater();
        let mut profile = UserProfile::new(me, "小明");

        let first = updater.extract_info(&[msg(me, "喜欢篮球和算法")], me);
        assert_eq!(first.merge_into(&mut profile), 2);
        let second = updater.extract_info(&[msg(me, "算法和编程")], me);
        assert_eq!(second.merge_into(&mut profile), 1);

        let tags = profile.matchable_interests().unwrap();
        assert!(tags.contains("算法"));
        assert!(tags.contains("编程"));
        assert!(profile.communication_style.is_some());
        assert_eq!(updater.top_interests(Some(1))[0].interest, "算法");
    }
}
