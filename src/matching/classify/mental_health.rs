//! Emotional risk detection and wellbeing advice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::classify::lexicon::{NEGATIVE_KEYWORDS, RISK_KEYWORDS};
use crate::matching::core::config::MentalHealthConfig;
use crate::matching::core::errors::MatchResult;
use crate::matching::core::kinds::EmotionLevel;
use crate::matching::core::message::Message;

/// Emotion classification of one message. Never mutated once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionRecord {
    /// Timestamp of the classified message.
    pub timestamp: DateTime<Utc>,
    /// Detected level.
    pub level: EmotionLevel,
    /// Every keyword of the winning tier found in the message.
    pub keywords: Vec<String>,
    /// The classified text.
    pub content: String,
}

/// Urgency of a piece of advice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceLevel {
    /// Crisis resources should be shown.
    High,
    /// Coping suggestions only.
    Medium,
}

/// A professional help line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HelpResource {
    /// Organization name.
    pub name: &'static str,
    /// Phone number.
    pub phone: &'static str,
}

/// Advice shown after a distressed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthAdvice {
    /// Crisis-level advice with hotline resources.
    Risk {
        /// Headline.
        message: &'static str,
        /// Suggested next steps.
        suggestions: &'static [&'static str],
        /// Hotlines and counselling centres.
        resources: &'static [HelpResource],
    },
    /// Everyday coping advice.
    Negative {
        /// Headline.
        message: &'static str,
        /// Suggested coping strategies.
        suggestions: &'static [&'static str],
    },
}

impl HealthAdvice {
    /// Urgency of the advice.
    #[must_use]
    pub const fn level(&self) -> AdviceLevel {
        match self {
            Self::Risk { .. } => AdviceLevel::High,
            Self::Negative { .. } => AdviceLevel::Medium,
        }
    }

    /// Hotline resources (empty for coping advice).
    #[must_use]
    pub const fn resources(&self) -> &'static [HelpResource] {
        match self {
            Self::Risk { resources, .. } => *resources,
            Self::Negative { .. } => &[],
        }
    }
}

const CRISIS_RESOURCES: &[HelpResource] = &[
    HelpResource {
        name: "清华大学心理咨询中心",
        phone: "010-62782502",
    },
    HelpResource {
        name: "北京市心理援助热线",
        phone: "010-82951332",
    },
    HelpResource {
        name: "全国心理援助热线",
        phone: "400-161-9995",
    },
];

const RISK_ADVICE: HealthAdvice = HealthAdvice::Risk {
    message: "我们注意到您可能正在经历困难时期。建议您：",
    suggestions: &[
        "与信任的朋友或家人交流",
        "联系学校心理咨询中心",
        "拨打心理援助热线：400-161-9995",
        "如有紧急情况，请拨打120或前往医院",
    ],
    resources: CRISIS_RESOURCES,
};

const NEGATIVE_ADVICE: HealthAdvice = HealthAdvice::Negative {
    message: "感觉到您最近可能有些压力，这里有一些建议：",
    suggestions: &[
        "尝试深呼吸或冥想放松",
        "进行适量运动，如散步或跑步",
        "与朋友聊聊天，分享你的感受",
        "保持规律作息，充足睡眠",
        "做一些你喜欢的事情",
    ],
};

const PERSISTENT_ADVICE: HealthAdvice = HealthAdvice::Negative {
    message: "我们注意到您最近可能情绪不太好，需要帮助吗？",
    suggestions: &[
        "与朋友或家人聊聊",
        "尝试一些放松活动",
        "如需要，可以联系心理咨询服务",
    ],
};

/// Per-user emotion tracker with an append-only history.
#[derive(Clone, Debug, Default)]
pub struct MentalHealthMonitor {
    config: MentalHealthConfig,
    history: Vec<EmotionRecord>,
}

impl MentalHealthMonitor {
    /// Create a monitor with the given streak settings.
    ///
    /// # Errors
    /// Returns `MatchError::InvalidConfig` for a zero window or a threshold
    /// outside `1..=window`.
    pub fn new(config: MentalHealthConfig) -> MatchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            history: Vec::new(),
        })
    }

    /// Emotion level of a text without recording it.
    #[must_use]
    pub fn classify_level(content: &str) -> EmotionLevel {
        classify_emotion(content).0
    }

    /// Classify a message and append the result to the history.
    ///
    /// Risk keywords are checked first; negative keywords only when no risk
    /// keyword is present. All keywords of the winning tier are collected.
    pub fn detect_emotion(&mut self, message: &Message) -> EmotionRecord {
        let (level, keywords) = classify_emotion(&message.content);

        if level == EmotionLevel::Risk {
            warn!(
                sender = %message.sender_id,
                keywords = ?keywords,
                "risk-level emotion detected"
            );
        } else {
            debug!(%level, "emotion classified");
        }

        let record = EmotionRecord {
            timestamp: message.timestamp,
            level,
            keywords: keywords.into_iter().map(str::to_string).collect(),
            content: message.content.clone(),
        };
        self.history.push(record.clone());
        record
    }

    /// Whether the recent window is dominated by negative or risk records.
    ///
    /// Always false until the history holds at least one full window.
    #[must_use]
    pub fn detect_persistent_negative_emotion(&self) -> bool {
        let window = self.config.window;
        if window == 0 || self.config.negative_threshold == 0 || self.history.len() < window {
            return false;
        }

        let distressed = self.history[self.history.len() - window..]
            .iter()
            .filter(|record| record.level.is_distressed())
            .count();
        distressed >= self.config.negative_threshold
    }

    /// Advice for a classified message; `None` for neutral messages.
    #[must_use]
    pub const fn health_advice(record: &EmotionRecord) -> Option<HealthAdvice> {
        match record.level {
            EmotionLevel::Risk => Some(RISK_ADVICE),
            EmotionLevel::Negative => Some(NEGATIVE_ADVICE),
            EmotionLevel::Neutral => None,
        }
    }

    /// Advice shown when a persistent low mood is detected.
    #[must_use]
    pub const fn persistent_advice() -> HealthAdvice {
        PERSISTENT_ADVICE
    }

    /// Recorded emotions in insertion order.
    #[must_use]
    pub fn history(&self) -> &[EmotionRecord] {
        &self.history
    }

    /// Levels of the most recent `n` records, oldest first.
    #[must_use]
    pub fn recent_levels(&self, n: usize) -> Vec<EmotionLevel> {
        let start = self.history.len().saturating_sub(n);
        self.history[start..].iter().map(|record| record.level).collect()
    }
}

fn classify_emotion(content: &str) -> (EmotionLevel, Vec<&'static str>) {
    let risk: Vec<&'static str> = RISK_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| content.contains(kw))
        .collect();
    if !risk.is_empty() {
        return (EmotionLevel::Risk, risk);
    }

    let negative: Vec<&'static str> = NEGATIVE_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| content.contains(kw))
        .collect();
    if !negative.is_empty() {
        return (EmotionLevel::Negative, negative);
    }

    (EmotionLevel::Neutral, Vec::new())
}
