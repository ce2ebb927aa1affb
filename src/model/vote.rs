use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::Record;

use super::{CandidateId, ElectionId, MemberId, VoteId};

/// An accepted vote.
///
/// Created exactly once per accepted cast and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Vote unique ID.
    pub id: VoteId,
    /// The member who cast the vote.
    pub member_id: MemberId,
    /// The election the vote was cast in.
    pub election_id: ElectionId,
    /// The candidate voted for.
    pub candidate: CandidateId,
    /// When the vote was cast; lies within the election's ballot window.
    #[serde(with = "ts_seconds")]
    pub cast_at: DateTime<Utc>,
}

impl Record for Vote {
    const KIND: &'static str = "vote";

    fn key(&self) -> &str {
        &self.id
    }
}
