//! Candidate ranking for a matching request.

use crate::matching::core::kinds::Scene;
use crate::matching::core::user_profile::UserProfile;
use crate::matching::scoring::optimizer::{MatchScore, MatchingOptimizer};

/// Candidate with its score breakdown.
#[derive(Clone, Debug)]
pub struct RankedCandidate {
    /// Value used for ordering: the total, scaled down for virtual users.
    pub rank_key: f64,
    /// Unscaled score breakdown.
    pub score: MatchScore,
    /// Candidate profile.
    pub profile: UserProfile,
}

/// Score every candidate against `user` and sort best first.
///
/// Virtual candidates have their ranking key multiplied by
/// `virtual_weight`; the displayed score is left untouched. Ties keep
/// input order.
#[must_use]
pub fn rank_candidates(
    optimizer: &MatchingOptimizer,
    user: &UserProfile,
    candidates: Vec<UserProfile>,
    scene: Scene,
    virtual_weight: f64,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.user_id != user.user_id)
        .map(|profile| {
            let score = optimizer.score_breakdown(user, &profile, scene);
            let rank_key = if profile.is_virtual {
                score.total * virtual_weight
            } else {
                score.total
            };
            RankedCandidate {
                rank_key,
                score,
                profile,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.rank_key.total_cmp(&a.rank_key));
    ranked
}
