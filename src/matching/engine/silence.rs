//! Detects stalled conversations and proposes a topic to restart them.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::matching::classify::mental_health::MentalHealthMonitor;
use crate::matching::core::config::SilenceConfig;
use crate::matching::core::kinds::{EmotionLevel, Scene, SilenceKind};
use crate::matching::core::message::Message;

const STUDY_TOPICS: &[&str] = &[
    "你的目标院校是哪里？",
    "你每天的学习时间安排是怎样的？",
    "有什么好的学习方法可以分享吗？",
    "你觉得考研最大的挑战是什么？",
    "你是如何保持学习动力的？",
];
const CAREER_TOPICS: &[&str] = &[
    "你对哪个行业感兴趣？",
    "你有什么职业规划？",
    "你参加过哪些实习或项目？",
    "你理想的工作是什么样的？",
    "你在求职过程中遇到了什么困难？",
];
const MENTAL_TOPICS: &[&str] = &[
    "最近有什么让你感到困扰的事情吗？",
    "你通常如何缓解压力？",
    "有什么让你感到开心的事情吗？",
    "你觉得什么样的支持对你最有帮助？",
    "你想聊聊你的感受吗？",
];
const HOBBY_TOPICS: &[&str] = &[
    "你最喜欢的兴趣爱好是什么？",
    "你平时喜欢做什么？",
    "有什么想一起做的活动吗？",
    "你是怎么开始这个爱好的？",
    "你有什么推荐的资源或经验吗？",
];

/// Conversation starters for a scene.
#[must_use]
pub const fn topic_templates(scene: Scene) -> &'static [&'static str] {
    match scene {
        Scene::Study => STUDY_TOPICS,
        Scene::Career => CAREER_TOPICS,
        Scene::Mental => MENTAL_TOPICS,
        Scene::Hobby => HOBBY_TOPICS,
    }
}

impl SilenceKind {
    /// Lead-in placed before the suggested topic.
    #[must_use]
    pub const fn opener(self) -> &'static str {
        match self {
            Self::Anxious => "别紧张，慢慢来。",
            Self::Introverted => "没关系，可以从简单的话题开始。",
        }
    }
}

/// What made the conversation count as silent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceTrigger {
    /// No message for longer than the idle threshold.
    Idle,
    /// The latest messages are all very short.
    ShortMessages,
}

/// A detected silence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Silence {
    /// What tripped detection.
    pub trigger: SilenceTrigger,
    /// Likely reason.
    pub kind: SilenceKind,
    /// Confidence in `kind`, in `[0, 1]`.
    pub confidence: f64,
}

/// Assistant prompt for a silent conversation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SilencePrompt {
    /// The detected silence.
    pub silence: Silence,
    /// Scene the topics were drawn from.
    pub scene: Scene,
    /// Candidate topics for the scene.
    pub topics: &'static [&'static str],
}

impl SilencePrompt {
    /// Opener followed by a randomly chosen topic.
    #[must_use]
    pub fn suggestion<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let topic = self.topics[rng.gen_range(0..self.topics.len())];
        format!("{}{topic}", self.silence.kind.opener())
    }
}

/// Checks a conversation for idle time or a run of short replies.
#[derive(Clone, Debug, Default)]
pub struct SilenceDetector {
    config: SilenceConfig,
}

impl SilenceDetector {
    /// Create a detector.
    #[must_use]
    pub const fn new(config: SilenceConfig) -> Self {
        Self { config }
    }

    /// Silence state of `messages` (oldest first) at `now`.
    ///
    /// An empty conversation is never silent.
    #[must_use]
    pub fn detect(&self, messages: &[Message], now: DateTime<Utc>) -> Option<Silence> {
        let last = messages.last()?;
        let idle_ms = now.signed_duration_since(last.timestamp).num_milliseconds();

        let trigger = if idle_ms >= self.config.idle_after_ms {
            SilenceTrigger::Idle
        } else if self.short_run(messages) {
            SilenceTrigger::ShortMessages
        } else {
            return None;
        };

        let (kind, confidence) = self.classify(messages);
        debug!(?trigger, %kind, confidence, idle_ms, "conversation silence detected");
        Some(Silence {
            trigger,
            kind,
            confidence,
        })
    }

    fn short_run(&self, messages: &[Message]) -> bool {
        let run = self.config.short_message_run;
        messages.len() >= run
            && messages[messages.len() - run..]
                .iter()
                .all(|m| m.char_len() < self.config.short_message_chars)
    }

    #[allow(clippy::cast_precision_loss)]
    fn classify(&self, messages: &[Message]) -> (SilenceKind, f64) {
        let start = messages.len().saturating_sub(self.config.emotion_window);
        let recent = &messages[start..];
        if recent.is_empty() {
            return (SilenceKind::Introverted, 0.6);
        }

        let (risk, distressed) = recent.iter().fold((0_usize, 0_usize), |(risk, distressed), m| {
            match MentalHealthMonitor::classify_level(&m.content) {
                EmotionLevel::Risk => (risk + 1, distressed + 1),
                EmotionLevel::Negative => (risk, distressed + 1),
                EmotionLevel::Neutral => (risk, distressed),
            }
        });
        let total = recent.len() as f64;

        let risk_ratio = risk as f64 / total;
        if risk_ratio > 0.4 {
            return (SilenceKind::Anxious, (risk_ratio + 0.3).min(0.9));
        }
        let distressed_ratio = distressed as f64 / total;
        if distressed_ratio > 0.5 {
            return (SilenceKind::Anxious, (distressed_ratio + 0.2).min(0.8));
        }
        (SilenceKind::Introverted, 0.6)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::matching::core::ids::UserId;

    fn chat(start: DateTime<Utc>, texts: &[&str]) -> Vec<Message> {
        texts
            .iter()
            .zip(0_i64..)
            .map(|(text, i)| Message::new(UserId::new(), *text, start + Duration::seconds(i)))
            .collect()
    }

    const LONG: &str = "我最近在准备考研，每天都去图书馆自习，感觉进度还可以但是数学有点吃力";

    #[test]
    fn test_empty_conversation_is_not_silent() {
        assert!(SilenceDetector::default().detect(&[], Utc::now()).is_none());
    }

    #[test]
    fn test_idle_after_threshold() {
        let detector = SilenceDetector::default();
        let start = Utc::now();
        let messages = chat(start, &[LONG]);
        assert!(detector.detect(&messages, start + Duration::seconds(29)).is_none());

        let silence = detector.detect(&messages, start + Duration::seconds(30)).unwrap();
        assert_eq!(silence.trigger, SilenceTrigger::Idle);
        assert_eq!(silence.kind, SilenceKind::Introverted);
        assert!((silence.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_message_run() {
        let detector = SilenceDetector::default();
        let start = Utc::now();
        let messages = chat(start, &[LONG, "嗯", "好的", "哈哈"]);
        let silence = detector.detect(&messages, start + Duration::seconds(5)).unwrap();
        assert_eq!(silence.trigger, SilenceTrigger::ShortMessages);

        let lively = chat(start, &["嗯", "好的", LONG]);
        assert!(detector.detect(&lively, start + Duration::seconds(5)).is_none());
    }

    #[test]
    fn test_distressed_conversation_reads_as_anxious() {
        let detector = SilenceDetector::default();
        let start = Utc::now();

        let risky = chat(start, &["好孤独", "失眠了", "你好"]);
        let silence = detector.detect(&risky, start + Duration::minutes(1)).unwrap();
        assert_eq!(silence.kind, SilenceKind::Anxious);
        assert!((silence.confidence - 0.9).abs() < 1e-9);

        let worried = chat(start, &["有点焦虑", "压力好大", "孤独", "你好", "好的"]);
        let silence = detector.detect(&worried, start + Duration::minutes(1)).unwrap();
        // risk 1/5, distressed 3/5
        assert_eq!(silence.kind, SilenceKind::Anxious);
        assert!((silence.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_prompt_suggestion_uses_scene_topics() {
        let silence = Silence {
            trigger: SilenceTrigger::Idle,
            kind: SilenceKind::Anxious,
            confidence: 0.7,
        };
        let prompt = SilencePrompt {
            silence,
            scene: Scene::Career,
            topics: topic_templates(Scene::Career),
        };
        let text = prompt.suggestion(&mut StdRng::seed_from_u64(3));
        let topic = text.strip_prefix(SilenceKind::Anxious.opener()).unwrap();
        assert!(CAREER_TOPICS.contains(&topic));
    }

    #[test]
    fn test_every_scene_has_topics() {
        for &scene in Scene::ALL {
            assert_eq!(topic_templates(scene).len(), 5);
        }
    }
}
