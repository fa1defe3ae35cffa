//! Match feedback records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::core::ids::{MatchId, UserId};
use crate::matching::core::kinds::FeedbackKind;

/// One piece of user feedback on a match. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Rated match.
    pub match_id: MatchId,
    /// User who rated it.
    pub user_id: UserId,
    /// The rating.
    pub feedback: FeedbackKind,
    /// When it was submitted.
    pub timestamp: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(match_id: MatchId, user_id: UserId, feedback: FeedbackKind) -> Self {
        Self {
            match_id,
            user_id,
            feedback,
            timestamp: Utc::now(),
        }
    }
}

/// Share of positive records; `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn positive_rate(records: &[FeedbackRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let positive = records
        .iter()
        .filter(|r| r.feedback == FeedbackKind::Positive)
        .count();
    Some(positive as f64 / records.len() as f64)
}
