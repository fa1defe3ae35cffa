//! Enumerated kinds shared across classifiers and scoring.
//!
//! Every kind has a stable lowercase (or, for MBTI codes, uppercase)
//! identifier used for serialization, logs, and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matching::core::errors::MatchError;

/// Declare `as_str`, `ALL`, `Display`, and a case-insensitive `FromStr`.
macro_rules! impl_kind {
    (
        $name:ident,
        on_unknown = $err:expr,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable string representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MatchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| ($err)(raw.to_string()))
            }
        }
    };
}

/// Matching context that scopes candidate pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// Study partners (exam preparation, coursework).
    Study,
    /// Career exchange (internships, job hunting).
    Career,
    /// Emotional support and mental wellbeing.
    Mental,
    /// Shared hobbies.
    Hobby,
}

impl_kind!(Scene, on_unknown = MatchError::UnknownScene, {
    Study => "study",
    Career => "career",
    Mental => "mental",
    Hobby => "hobby",
});

/// One of the sixteen MBTI personality-type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum MbtiType {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

impl_kind!(MbtiType, on_unknown = MatchError::UnknownMbtiType, {
    Intj => "INTJ",
    Intp => "INTP",
    Entj => "ENTJ",
    Entp => "ENTP",
    Infj => "INFJ",
    Infp => "INFP",
    Enfj => "ENFJ",
    Enfp => "ENFP",
    Istj => "ISTJ",
    Isfj => "ISFJ",
    Estj => "ESTJ",
    Esfj => "ESFJ",
    Istp => "ISTP",
    Isfp => "ISFP",
    Estp => "ESTP",
    Esfp => "ESFP",
});

/// Severity of a moderation verdict.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Content passed moderation.
    #[default]
    None,
    /// Minor violation; the sender is warned.
    Low,
    /// Sensitive content; the message is blocked.
    Medium,
    /// Serious violation; blocked and recorded.
    High,
}

impl_kind!(Severity, on_unknown = |value| MatchError::UnknownKind { kind: "severity", value }, {
    None => "none",
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// Category of content violation, in moderation priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// Harassment, threats, insults.
    Harassment,
    /// Pornographic, violent, or gory content.
    Inappropriate,
    /// Advertising and contact solicitation.
    Spam,
    /// Politically or religiously sensitive topics.
    Sensitive,
}

impl_kind!(ViolationType, on_unknown = |value| MatchError::UnknownKind { kind: "violation type", value }, {
    Harassment => "harassment",
    Inappropriate => "inappropriate",
    Spam => "spam",
    Sensitive => "sensitive",
});

impl ViolationType {
    /// Static severity for this violation category.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Harassment | Self::Inappropriate => Severity::High,
            Self::Spam => Severity::Low,
            Self::Sensitive => Severity::Medium,
        }
    }
}

/// Emotional risk level of a single message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLevel {
    /// No distress keywords.
    Neutral,
    /// Everyday stress or sadness.
    Negative,
    /// Possible crisis-level distress.
    Risk,
}

impl_kind!(EmotionLevel, on_unknown = |value| MatchError::UnknownKind { kind: "emotion level", value }, {
    Neutral => "neutral",
    Negative => "negative",
    Risk => "risk",
});

impl EmotionLevel {
    /// Whether this level counts toward a persistent low-mood streak.
    #[must_use]
    pub const fn is_distressed(self) -> bool {
        matches!(self, Self::Negative | Self::Risk)
    }
}

/// User feedback on a proposed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// The match was good.
    Positive,
    /// The match was bad.
    Negative,
    /// No opinion.
    Neutral,
}

impl_kind!(FeedbackKind, on_unknown = |value| MatchError::UnknownKind { kind: "feedback", value }, {
    Positive => "positive",
    Negative => "negative",
    Neutral => "neutral",
});

/// Sanction applied once a user accumulates violations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    /// Notice only; messages still go through.
    Warning,
    /// One day without sending.
    Mute,
    /// Seven days without sending.
    Suspend,
    /// Permanent.
    Ban,
}

impl_kind!(PenaltyKind, on_unknown = |value| MatchError::UnknownKind { kind: "penalty", value }, {
    Warning => "warning",
    Mute => "mute",
    Suspend => "suspend",
    Ban => "ban",
});

impl PenaltyKind {
    /// How long the penalty lasts; `None` means it never expires.
    #[must_use]
    pub const fn duration(self) -> Option<chrono::Duration> {
        match self {
            Self::Warning => Some(chrono::Duration::zero()),
            Self::Mute => Some(chrono::Duration::days(1)),
            Self::Suspend => Some(chrono::Duration::days(7)),
            Self::Ban => None,
        }
    }
}

/// Likely reason a conversation went quiet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceKind {
    /// Shy participants with no sign of distress.
    Introverted,
    /// Recent messages are mostly anxious or low.
    Anxious,
}

impl_kind!(SilenceKind, on_unknown = |value| MatchError::UnknownKind { kind: "silence kind", value }, {
    Introverted => "introverted",
    Anxious => "anxious",
});

/// Interest tag category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestCategory {
    /// Coursework, research, exam preparation.
    Academic,
    /// Internships, jobs, entrepreneurship.
    Career,
    /// General hobbies.
    Hobby,
    /// Sports and fitness.
    Sports,
    /// Films, shows, concerts.
    Entertainment,
}

impl_kind!(InterestCategory, on_unknown = |value| MatchError::UnknownKind { kind: "interest category", value }, {
    Academic => "academic",
    Career => "career",
    Hobby => "hobby",
    Sports => "sports",
    Entertainment => "entertainment",
});

impl InterestCategory {
    /// Categories compared when scoring interest overlap.
    pub const MATCHABLE: &'static [Self] = &[Self::Academic, Self::Career, Self::Hobby];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mbti_parse_is_case_insensitive() {
        assert_eq!("infp".parse::<MbtiType>().unwrap(), MbtiType::Infp);
        assert_eq!(" ENTJ ".parse::<MbtiType>().unwrap(), MbtiType::Entj);
        assert_eq!(MbtiType::ALL.len(), 16);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(matches!(
            "XXXX".parse::<MbtiType>(),
            Err(MatchError::UnknownMbtiType(v)) if v == "XXXX"
        ));
        assert!(matches!(
            "gaming".parse::<Scene>(),
            Err(MatchError::UnknownScene(_))
        ));
        assert!(matches!(
            "fatal".parse::<Severity>(),
            Err(MatchError::UnknownKind { kind: "severity", .. })
        ));
    }

    #[test]
    fn test_serde_identifiers() {
        assert_eq!(serde_json::to_string(&MbtiType::Infj).unwrap(), "\"INFJ\"");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        let scene: Scene = serde_json::from_str("\"mental\"").unwrap();
        assert_eq!(scene, Scene::Mental);
    }

    #[test]
    fn test_violation_severity_table() {
        assert_eq!(ViolationType::Harassment.severity(), Severity::High);
        assert_eq!(ViolationType::Inappropriate.severity(), Severity::High);
        assert_eq!(ViolationType::Spam.severity(), Severity::Low);
        assert_eq!(ViolationType::Sensitive.severity(), Severity::Medium);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Low > Severity::None);
    }

    #[test]
    fn test_penalty_durations() {
        assert_eq!(PenaltyKind::Warning.duration(), Some(chrono::Duration::zero()));
        assert_eq!(PenaltyKind::Mute.duration(), Some(chrono::Duration::days(1)));
        assert_eq!(PenaltyKind::Suspend.duration(), Some(chrono::Duration::days(7)));
        assert_eq!(PenaltyKind::Ban.duration(), None);
        assert_eq!("BAN".parse::<PenaltyKind>().unwrap(), PenaltyKind::Ban);
    }
}
