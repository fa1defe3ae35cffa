//! Per-user violation log and the penalties it earns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::matching::classify::moderation::ModerationVerdict;
use crate::matching::core::config::PenaltyConfig;
use crate::matching::core::ids::{ConversationId, UserId, ViolationId};
use crate::matching::core::kinds::{PenaltyKind, Severity, ViolationType};

/// Characters of the offending message kept in a record.
pub const CONTENT_SNAPSHOT_CHARS: usize = 200;

/// One failed moderation check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Record identifier.
    pub id: ViolationId,
    /// Offending user.
    pub user_id: UserId,
    /// Conversation the message was sent to.
    pub conversation_id: ConversationId,
    /// Violated category.
    pub violation_type: ViolationType,
    /// Severity of the category.
    pub severity: Severity,
    /// Keywords that triggered moderation.
    pub keywords: Vec<String>,
    /// Leading characters of the message.
    pub content_snapshot: String,
    /// When the message was submitted.
    pub detected_at: DateTime<Utc>,
}

impl ViolationRecord {
    /// Build a record from a failed verdict; `None` when the verdict passed.
    #[must_use]
    pub fn from_verdict(
        verdict: &ModerationVerdict,
        user_id: UserId,
        conversation_id: ConversationId,
        content: &str,
        detected_at: DateTime<Utc>,
    ) -> Option<Self> {
        let violation_type = verdict.violation_type?;
        Some(Self {
            id: ViolationId::new(),
            user_id,
            conversation_id,
            violation_type,
            severity: verdict.severity,
            keywords: verdict.keywords.clone(),
            content_snapshot: content.chars().take(CONTENT_SNAPSHOT_CHARS).collect(),
            detected_at,
        })
    }
}

/// A sanction issued when the violation count reaches a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    /// Kind of sanction.
    pub kind: PenaltyKind,
    /// Violation count that triggered it.
    pub violation_count: usize,
    /// When it was issued.
    pub issued_at: DateTime<Utc>,
    /// When it lapses; `None` for a permanent ban.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Penalty {
    fn issue(kind: PenaltyKind, violation_count: usize, issued_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            violation_count,
            issued_at,
            expires_at: kind.duration().map(|duration| issued_at + duration),
        }
    }

    /// Whether the penalty still restricts the user at `now`.
    ///
    /// Warnings never restrict.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.kind != PenaltyKind::Warning && self.expires_at.is_none_or(|end| now < end)
    }
}

/// Violations and penalties of one user, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ViolationHistory {
    records: Vec<ViolationRecord>,
    penalties: Vec<Penalty>,
}

impl ViolationHistory {
    /// Append a record; returns the penalty issued if the new count hits a threshold.
    ///
    /// The heaviest penalty whose threshold is reached applies.
    pub fn record(&mut self, record: ViolationRecord, config: &PenaltyConfig) -> Option<Penalty> {
        let detected_at = record.detected_at;
        let user_id = record.user_id;
        self.records.push(record);

        let count = self.records.len();
        let thresholds = [
            config.warning_at,
            config.mute_at,
            config.suspend_at,
            config.ban_at,
        ];
        if !thresholds.contains(&count) {
            return None;
        }

        let kind = if count >= config.ban_at {
            PenaltyKind::Ban
        } else if count >= config.suspend_at {
            PenaltyKind::Suspend
        } else if count >= config.mute_at {
            PenaltyKind::Mute
        } else {
            PenaltyKind::Warning
        };
        let penalty = Penalty::issue(kind, count, detected_at);
        warn!(user = %user_id, penalty = %kind, violations = count, "penalty issued");
        self.penalties.push(penalty);
        Some(penalty)
    }

    /// Recorded violations.
    #[must_use]
    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    /// Issued penalties, including expired ones.
    #[must_use]
    pub fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    /// The most recently issued penalty still in force at `now`.
    #[must_use]
    pub fn active_penalty(&self, now: DateTime<Utc>) -> Option<Penalty> {
        self.penalties
            .iter()
            .rev()
            .find(|penalty| penalty.is_active(now))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::matching::classify::moderation::ContentModerator;

    fn record(at: DateTime<Utc>) -> ViolationRecord {
        let verdict = ContentModerator::new().moderate("加微信领红包");
        ViolationRecord::from_verdict(&verdict, UserId::new(), ConversationId::new(), "加微信", at)
            .unwrap()
    }

    #[test]
    fn test_clean_verdict_makes_no_record() {
        let verdict = ContentModerator::new().moderate("你好");
        assert!(
            ViolationRecord::from_verdict(
                &verdict,
                UserId::new(),
                ConversationId::new(),
                "你好",
                Utc::now()
            )
            .is_none()
        );
    }

    #[test]
    fn test_snapshot_is_truncated() {
        let verdict = ContentModerator::new().moderate("加微信");
        let long = "加".repeat(CONTENT_SNAPSHOT_CHARS + 50);
        let record =
            ViolationRecord::from_verdict(&verdict, UserId::new(), ConversationId::new(), &long, Utc::now())
                .unwrap();
        assert_eq!(record.content_snapshot.chars().count(), CONTENT_SNAPSHOT_CHARS);
        assert_eq!(record.violation_type, ViolationType::Spam);
    }

    #[test]
    fn test_penalties_escalate_at_thresholds() {
        let config = PenaltyConfig::default();
        let mut history = ViolationHistory::default();
        let start = Utc::now();

        let mut issued = Vec::new();
        for i in 0..12 {
            if let Some(penalty) = history.record(record(start + Duration::minutes(i)), &config) {
                issued.push((penalty.violation_count, penalty.kind));
            }
        }

        assert_eq!(
            issued,
            vec![
                (1, PenaltyKind::Warning),
                (3, PenaltyKind::Mute),
                (5, PenaltyKind::Suspend),
                (10, PenaltyKind::Ban),
            ]
        );
        assert_eq!(history.records().len(), 12);
        assert_eq!(history.penalties().len(), 4);
    }

    #[test]
    fn test_warning_never_restricts_and_mute_expires() {
        let config = PenaltyConfig::default();
        let mut history = ViolationHistory::default();
        let start = Utc::now();

        let _ = history.record(record(start), &config);
        assert!(history.active_penalty(start).is_none());

        let _ = history.record(record(start), &config);
        let mute = history.record(record(start), &config).unwrap();
        assert_eq!(mute.kind, PenaltyKind::Mute);
        assert_eq!(mute.expires_at, Some(start + Duration::days(1)));
        assert_eq!(history.active_penalty(start + Duration::hours(23)), Some(mute));
        assert!(history.active_penalty(start + Duration::days(1)).is_none());
    }

    #[test]
    fn test_ban_is_permanent() {
        let penalty = Penalty::issue(PenaltyKind::Ban, 10, Utc::now());
        assert!(penalty.expires_at.is_none());
        assert!(penalty.is_active(Utc::now() + Duration::days(3650)));
    }
}
