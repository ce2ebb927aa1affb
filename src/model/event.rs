use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CandidateId, ElectionId};

/// Notification that a new election has been called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElectionEvent {
    #[serde(with = "ts_seconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub end_time: DateTime<Utc>,
    /// The names on the ballot, in ballot order.
    pub candidates: Vec<CandidateId>,
}

/// Notification that a vote has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVoteEvent {
    pub first_name: String,
    pub last_name: String,
    pub election_id: ElectionId,
    pub candidate: CandidateId,
}

/// The closed set of notifications the engines can publish.
///
/// Events are immutable, fire-once, and carry no persisted identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    NewElection(NewElectionEvent),
    NewVote(NewVoteEvent),
}
