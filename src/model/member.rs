use serde::{Deserialize, Serialize};

use crate::registry::Record;

use super::{CandidateId, ElectionId, MemberId};

/// A registered member of the voting body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member unique ID.
    pub id: MemberId,
    /// Member first name.
    pub first_name: String,
    /// Member last name.
    pub last_name: String,
    /// Whether the member has an accepted vote in the current election
    /// cycle. Cleared for everyone when a new election is called.
    pub voted: bool,
    /// Whether the member is authorized to call elections.
    pub is_director: bool,
    /// IDs of the elections the member has voted in, oldest first.
    /// Appended as they vote, index-aligned with `vote_history`.
    pub election_history: Vec<ElectionId>,
    /// Names of the candidates the member voted for, oldest first.
    pub vote_history: Vec<CandidateId>,
}

impl Member {
    /// Create a new member with a blank voting record.
    pub fn new(
        id: MemberId,
        first_name: String,
        last_name: String,
        is_director: bool,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            voted: false,
            is_director,
            election_history: Vec::new(),
            vote_history: Vec::new(),
        }
    }
}

impl Record for Member {
    const KIND: &'static str = "member";

    fn key(&self) -> &str {
        &self.id
    }
}
