//! Content moderation for outgoing chat messages.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::classify::keyword::KeywordClassifier;
use crate::matching::classify::lexicon::VIOLATION_KEYWORDS;
use crate::matching::core::kinds::{Severity, ViolationType};

/// Outcome of moderating one message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// Whether the message is clean.
    pub passed: bool,
    /// First violated category, if any.
    pub violation_type: Option<ViolationType>,
    /// Keywords that triggered the verdict.
    pub keywords: Vec<String>,
    /// `None` exactly when `passed` is true.
    pub severity: Severity,
}

impl ModerationVerdict {
    const fn clean() -> Self {
        Self {
            passed: true,
            violation_type: None,
            keywords: Vec::new(),
            severity: Severity::None,
        }
    }

    const fn violation(violation_type: ViolationType, keywords: Vec<String>) -> Self {
        Self {
            passed: false,
            violation_type: Some(violation_type),
            keywords,
            severity: violation_type.severity(),
        }
    }
}

/// What to do with a flagged message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Deliver, but warn the sender.
    Warn,
    /// Drop the message.
    Block,
    /// Drop the message and keep a violation record.
    BlockAndReport,
}

impl ActionKind {
    /// Whether the message must not be delivered.
    #[must_use]
    pub const fn blocks(self) -> bool {
        !matches!(self, Self::Warn)
    }
}

/// Action plus the notice shown to the sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModerationAction {
    /// Action to take.
    pub action: ActionKind,
    /// User-facing notice.
    pub message: &'static str,
}

/// Keyword-based content moderator.
#[derive(Clone, Copy, Debug)]
pub struct ContentModerator {
    classifier: KeywordClassifier<ViolationType>,
}

impl Default for ContentModerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentModerator {
    /// Create a moderator over the built-in violation lexicon.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classifier: KeywordClassifier::new(VIOLATION_KEYWORDS),
        }
    }

    /// Moderate a message, stopping at the first violated category.
    ///
    /// Categories are checked as harassment, inappropriate, spam, sensitive;
    /// only the first matching keyword of that category is reported.
    #[must_use]
    pub fn moderate(&self, content: &str) -> ModerationVerdict {
        self.classifier.first_match(content).map_or_else(
            ModerationVerdict::clean,
            |(violation_type, keyword)| {
                debug!(%violation_type, keyword, "message failed moderation");
                ModerationVerdict::violation(violation_type, vec![keyword.to_string()])
            },
        )
    }

    /// Moderate a message, reporting every violated category.
    ///
    /// Verdicts come back in priority order, each with all of its keywords;
    /// an empty vector means the message is clean.
    #[must_use]
    pub fn moderate_all(&self, content: &str) -> Vec<ModerationVerdict> {
        self.classifier
            .classify(content)
            .into_iter()
            .map(|hit| {
                ModerationVerdict::violation(
                    hit.category,
                    hit.keywords.into_iter().map(str::to_string).collect(),
                )
            })
            .collect()
    }

    /// Map a severity to the action taken on the message.
    ///
    /// Anything that is not `medium` or `high` is treated as `low`.
    #[must_use]
    pub const fn action_for(severity: Severity) -> ModerationAction {
        match severity {
            Severity::High => ModerationAction {
                action: ActionKind::BlockAndReport,
                message: "您的消息严重违规，已被拦截并记录",
            },
            Severity::Medium => ModerationAction {
                action: ActionKind::Block,
                message: "您的消息包含敏感内容，已被拦截",
            },
            Severity::Low | Severity::None => ModerationAction {
                action: ActionKind::Warn,
                message: "您的消息包含不当内容，请注意言辞",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_message_passes() {
        let verdict = ContentModerator::new().moderate("今天一起去图书馆学习吧");
        assert!(verdict.passed);
        assert_eq!(verdict.severity, Severity::None);
        assert!(verdict.violation_type.is_none());
        assert!(verdict.keywords.is_empty());
    }

    #[test]
    fn test_first_category_wins() {
        let verdict = ContentModerator::new().moderate("加微信，不然威胁你");
        assert!(!verdict.passed);
        assert_eq!(verdict.violation_type, Some(ViolationType::Harassment));
        assert_eq!(verdict.keywords, vec!["威胁"]);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn test_only_first_keyword_of_category_reported() {
        let verdict = ContentModerator::new().moderate("广告推广，刷单");
        assert_eq!(verdict.violation_type, Some(ViolationType::Spam));
        assert_eq!(verdict.keywords, vec!["广告"]);
        assert_eq!(verdict.severity, Severity::Low);
    }

    #[test]
    fn test_severity_none_iff_passed() {
        let moderator = ContentModerator::new();
        for text in ["你好", "谈谈宗教", "暴力", "加QQ", "侮辱", ""] {
            let verdict = moderator.moderate(text);
            assert_eq!(verdict.passed, verdict.severity == Severity::None, "{text}");
        }
    }

    #[test]
    fn test_moderate_all_reports_every_category() {
        let verdicts = ContentModerator::new().moderate_all("加微信，不然威胁你，广告");
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].violation_type, Some(ViolationType::Harassment));
        assert_eq!(verdicts[1].violation_type, Some(ViolationType::Spam));
        assert_eq!(verdicts[1].keywords, vec!["广告", "加微信"]);
        assert!(ContentModerator::new().moderate_all("你好").is_empty());
    }

    #[test]
    fn test_actions_by_severity() {
        assert_eq!(
            ContentModerator::action_for(Severity::High).action,
            ActionKind::BlockAndReport
        );
        assert_eq!(
            ContentModerator::action_for(Severity::Medium).action,
            ActionKind::Block
        );
        assert_eq!(ContentModerator::action_for(Severity::Low).action, ActionKind::Warn);
        assert!(!ActionKind::Warn.blocks());
        assert!(ActionKind::Block.blocks());
    }
}
