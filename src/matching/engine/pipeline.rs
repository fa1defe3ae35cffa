//! Chat message pipeline: moderation, wellbeing, quality and profiling.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use tracing::{debug, info, warn};

use crate::matching::classify::mental_health::{EmotionRecord, HealthAdvice, MentalHealthMonitor};
use crate::matching::classify::moderation::{ContentModerator, ModerationAction, ModerationVerdict};
use crate::matching::classify::quality::{
    ConversationQualityMonitor, QualityAssessment, QualityScore,
};
use crate::matching::core::config::MatchConfig;
use crate::matching::core::errors::MatchResult;
use crate::matching::core::ids::{ConversationId, UserId};
use crate::matching::core::kinds::{Scene, Severity};
use crate::matching::core::message::Message;
use crate::matching::core::user_profile::{PersonalityTraits, UserProfile};
use crate::matching::engine::silence::{SilenceDetector, SilencePrompt, topic_templates};
use crate::matching::engine::violations::{Penalty, ViolationHistory, ViolationRecord};
use crate::matching::profile::interests::InterestCount;
use crate::matching::profile::personality::{PersonalityAnalyzer, ProfileDescription};
use crate::matching::profile::updater::{ProfileUpdate, ProfileUpdater};

/// Analyses attached to a delivered message.
#[derive(Clone, Debug)]
pub struct Delivery {
    /// The stored message.
    pub message: Message,
    /// Moderation notice for low-severity violations that were let through.
    pub warning: Option<ModerationAction>,
    /// Penalty issued for the let-through violation, if it crossed a threshold.
    pub penalty: Option<Penalty>,
    /// Emotion classification of the message.
    pub emotion: EmotionRecord,
    /// Advice for a distressed message.
    pub advice: Option<HealthAdvice>,
    /// Advice when the sender's recent messages are mostly distressed.
    pub persistent_advice: Option<HealthAdvice>,
    /// Conversation quality after this message.
    pub quality: QualityScore,
    /// Interests and style found in the message.
    pub profile_update: ProfileUpdate,
}

/// Result of submitting a message.
#[derive(Clone, Debug)]
pub enum MessageOutcome {
    /// The sender is muted, suspended or banned; moderation did not run.
    Restricted {
        /// The penalty in force.
        penalty: Penalty,
    },
    /// Rejected by moderation; only the violation was recorded.
    Blocked {
        /// Moderation verdict.
        verdict: ModerationVerdict,
        /// Action taken.
        action: ModerationAction,
        /// Penalty issued for this violation, if it crossed a threshold.
        penalty: Option<Penalty>,
    },
    /// Stored and analyzed.
    Delivered(Box<Delivery>),
}

impl MessageOutcome {
    /// Whether the message was stored.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    /// The delivery analyses, if the message was stored.
    #[must_use]
    pub fn into_delivery(self) -> Option<Delivery> {
        match self {
            Self::Delivered(delivery) => Some(*delivery),
            Self::Blocked { .. } | Self::Restricted { .. } => None,
        }
    }
}

struct UserSession {
    mental_health: MentalHealthMonitor,
    updater: ProfileUpdater,
    profile: UserProfile,
    sent: Vec<Message>,
    violations: ViolationHistory,
}

impl UserSession {
    fn new(user_id: UserId, config: &MatchConfig) -> MatchResult<Self> {
        Ok(Self {
            mental_health: MentalHealthMonitor::new(config.mental_health.clone())?,
            updater: ProfileUpdater::new(config.profile.clone())?,
            profile: UserProfile::new(user_id, user_id.to_string()),
            sent: Vec::new(),
            violations: ViolationHistory::default(),
        })
    }
}

struct ConversationState {
    messages: Vec<Message>,
    quality: ConversationQualityMonitor,
    scores: Vec<QualityScore>,
    last_prompt: Option<DateTime<Utc>>,
}

/// Runs every incoming message through moderation and the monitors.
///
/// Per-user and per-conversation state live in concurrent maps, so one
/// pipeline can be shared across threads.
pub struct ChatPipeline {
    config: MatchConfig,
    moderator: ContentModerator,
    silence: SilenceDetector,
    sessions: DashMap<UserId, UserSession>,
    conversations: DashMap<ConversationId, ConversationState>,
}

impl ChatPipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: MatchConfig) -> MatchResult<Self> {
        config.validate()?;
        Ok(Self {
            silence: SilenceDetector::new(config.silence.clone()),
            config,
            moderator: ContentModerator::new(),
            sessions: DashMap::new(),
            conversations: DashMap::new(),
        })
    }

    /// Submit a message from `sender` to a conversation.
    ///
    /// Restricted senders are turned away before moderation. Every failed
    /// moderation is recorded against the sender and may issue a penalty;
    /// blocked messages never reach the conversation, the emotion history
    /// or the profile.
    ///
    /// # Errors
    /// Returns an error if the sender's profile state cannot be created.
    pub fn submit(
        &self,
        conversation_id: ConversationId,
        sender: UserId,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> MatchResult<MessageOutcome> {
        if let Some(penalty) = self.active_penalty(sender, timestamp) {
            info!(user = %sender, penalty = %penalty.kind, "restricted sender turned away");
            return Ok(MessageOutcome::Restricted { penalty });
        }

        let verdict = self.moderator.moderate(content);
        let (warning, penalty) = if verdict.passed {
            (None, None)
        } else {
            let action = ContentModerator::action_for(verdict.severity);
            if verdict.severity == Severity::High {
                warn!(
                    user = %sender,
                    violation = ?verdict.violation_type,
                    keywords = ?verdict.keywords,
                    %timestamp,
                    "content violation recorded"
                );
            }
            let mut penalty = None;
            if let Some(record) =
                ViolationRecord::from_verdict(&verdict, sender, conversation_id, content, timestamp)
            {
                penalty = self
                    .session(sender)?
                    .violations
                    .record(record, &self.config.penalties);
            }
            if action.action.blocks() {
                info!(conversation = %conversation_id, user = %sender, "message blocked");
                return Ok(MessageOutcome::Blocked {
                    verdict,
                    action,
                    penalty,
                });
            }
            (Some(action), penalty)
        };

        let message = Message::new(sender, content, timestamp);

        let (emotion, advice, persistent_advice, profile_update) = {
            let mut entry = self.session(sender)?;
            let session = &mut *entry;
            let emotion = session.mental_health.detect_emotion(&message);
            let advice = MentalHealthMonitor::health_advice(&emotion);
            let persistent_advice = session
                .mental_health
                .detect_persistent_negative_emotion()
                .then(MentalHealthMonitor::persistent_advice);
            if persistent_advice.is_some() {
                info!(user = %sender, "persistent low mood detected");
            }

            let profile_update = session
                .updater
                .extract_info(std::slice::from_ref(&message), sender);
            let added = profile_update.merge_into(&mut session.profile);
            if added > 0 {
                debug!(user = %sender, added, "profile interests merged");
            }
            session.sent.push(message.clone());
            session.profile.personality = session.updater.personality(&session.sent, sender);
            (emotion, advice, persistent_advice, profile_update)
        };

        let quality = {
            let mut entry = self
                .conversations
                .entry(conversation_id)
                .or_insert_with(|| ConversationState {
                    messages: Vec::new(),
                    quality: ConversationQualityMonitor::new(self.config.quality.clone()),
                    scores: Vec::new(),
                    last_prompt: None,
                });
            let state = entry.value_mut();
            let quality = state.quality.analyze_message(&message, &state.messages);
            state.messages.push(message.clone());
            state.scores.push(quality);
            quality
        };

        debug!(
            conversation = %conversation_id,
            message = %message.id,
            level = %emotion.level,
            overall = quality.overall,
            "message delivered"
        );

        Ok(MessageOutcome::Delivered(Box::new(Delivery {
            message,
            warning,
            penalty,
            emotion,
            advice,
            persistent_advice,
            quality,
            profile_update,
        })))
    }

    /// Store the declared profile of a user.
    ///
    /// Interests and style already learned from chat are merged into it;
    /// traits learned from chat replace the declared ones once the user
    /// has spoken.
    ///
    /// # Errors
    /// Returns an error if the user's profile state cannot be created.
    pub fn register_profile(&self, profile: UserProfile) -> MatchResult<()> {
        let user_id = profile.user_id;
        debug!(user = %user_id, "registering profile");
        let mut entry = self.session(user_id)?;
        let session = &mut *entry;
        let learned = std::mem::replace(&mut session.profile, profile);

        for (category, tags) in learned.interests.into_iter().flatten() {
            session.profile.add_interests(category, tags);
        }
        if session.profile.communication_style.is_none() {
            session.profile.communication_style = learned.communication_style;
        }
        if !session.sent.is_empty() {
            session.profile.personality = learned.personality;
        }
        drop(entry);
        Ok(())
    }

    /// Current profile of a user, with everything learned from chat folded in.
    ///
    /// `None` for a user the pipeline has never seen.
    #[must_use]
    pub fn profile(&self, user_id: UserId) -> Option<UserProfile> {
        self.sessions
            .get(&user_id)
            .map(|session| session.profile.clone())
    }

    /// Snapshot of a conversation's messages in delivery order.
    #[must_use]
    pub fn conversation(&self, conversation_id: ConversationId) -> Option<Vec<Message>> {
        self.conversations
            .get(&conversation_id)
            .map(|state| state.messages.clone())
    }

    /// Most mentioned interests across everything `user_id` has sent.
    ///
    /// Uses the configured default limit when `limit` is `None`.
    #[must_use]
    pub fn top_interests(&self, user_id: UserId, limit: Option<usize>) -> Vec<InterestCount> {
        self.sessions
            .get(&user_id)
            .map(|session| session.updater.top_interests(limit))
            .unwrap_or_default()
    }

    /// Trait estimates of `user_id` from one conversation.
    ///
    /// The neutral prior is returned when the user has not spoken there.
    #[must_use]
    pub fn personality(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
    ) -> PersonalityTraits {
        let messages = self.conversation(conversation_id).unwrap_or_default();
        PersonalityAnalyzer.analyze(&messages, user_id)
    }

    /// Prose profile of `user_id` from one conversation.
    #[must_use]
    pub fn profile_description(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
    ) -> ProfileDescription {
        let messages = self.conversation(conversation_id).unwrap_or_default();
        let traits = PersonalityAnalyzer.analyze(&messages, user_id);
        PersonalityAnalyzer.describe(&traits, &messages, user_id)
    }

    /// Violations recorded against a user, oldest first.
    #[must_use]
    pub fn violation_history(&self, user_id: UserId) -> Vec<ViolationRecord> {
        self.sessions
            .get(&user_id)
            .map(|session| session.violations.records().to_vec())
            .unwrap_or_default()
    }

    /// Penalties issued to a user, oldest first, expired ones included.
    #[must_use]
    pub fn penalties(&self, user_id: UserId) -> Vec<Penalty> {
        self.sessions
            .get(&user_id)
            .map(|session| session.violations.penalties().to_vec())
            .unwrap_or_default()
    }

    /// Whether a mute, suspension or ban is in force at `now`.
    #[must_use]
    pub fn is_user_penalized(&self, user_id: UserId, now: DateTime<Utc>) -> bool {
        self.active_penalty(user_id, now).is_some()
    }

    /// Assistant prompt if the conversation has gone quiet at `now`.
    ///
    /// At most one prompt is returned per cooldown period.
    #[must_use]
    pub fn check_silence(
        &self,
        conversation_id: ConversationId,
        scene: Scene,
        now: DateTime<Utc>,
    ) -> Option<SilencePrompt> {
        let silence = {
            let mut state = self.conversations.get_mut(&conversation_id)?;
            let cooling = state.last_prompt.is_some_and(|at| {
                now.signed_duration_since(at).num_milliseconds() < self.config.silence.cooldown_ms
            });
            if cooling {
                return None;
            }
            let silence = self.silence.detect(&state.messages, now)?;
            state.last_prompt = Some(now);
            silence
        };

        info!(
            conversation = %conversation_id,
            %scene,
            kind = %silence.kind,
            "assistant prompt for silent conversation"
        );
        Some(SilencePrompt {
            silence,
            scene,
            topics: topic_templates(scene),
        })
    }

    /// Whole-conversation quality verdict; `None` until enough messages exist.
    #[must_use]
    pub fn assess_quality(&self, conversation_id: ConversationId) -> Option<QualityAssessment> {
        let assessment = self
            .conversations
            .get(&conversation_id)
            .and_then(|state| state.quality.assess(&state.scores))?;
        if assessment.low_quality {
            info!(
                conversation = %conversation_id,
                overall = assessment.average.overall,
                "low-quality conversation"
            );
        }
        Some(assessment)
    }

    fn active_penalty(&self, user_id: UserId, now: DateTime<Utc>) -> Option<Penalty> {
        self.sessions
            .get(&user_id)
            .and_then(|session| session.violations.active_penalty(now))
    }

    fn session(&self, user_id: UserId) -> MatchResult<RefMut<'_, UserId, UserSession>> {
        if let Some(session) = self.sessions.get_mut(&user_id) {
            return Ok(session);
        }
        let fresh = UserSession::new(user_id, &self.config)?;
        Ok(self.sessions.entry(user_id).or_insert(fresh))
    }
}
