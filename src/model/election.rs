use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::Record;

use super::{CandidateId, ElectionId, MemberId};

/// An election on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Election unique ID.
    pub id: ElectionId,
    /// Start of the ballot window.
    #[serde(with = "ts_seconds")]
    pub start_time: DateTime<Utc>,
    /// End of the ballot window.
    #[serde(with = "ts_seconds")]
    pub end_time: DateTime<Utc>,
    /// The director who called the election.
    pub director: MemberId,
    /// Candidates in ballot order, each with their running tally.
    pub candidates: Vec<Candidate>,
}

impl Election {
    /// Create a new election with every tally at zero.
    pub fn new(
        id: ElectionId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        director: MemberId,
        candidate_names: Vec<CandidateId>,
    ) -> Self {
        Self {
            id,
            start_time,
            end_time,
            director,
            candidates: candidate_names
                .into_iter()
                .map(|name| Candidate { name, votes: 0 })
                .collect(),
        }
    }

    /// Look up a candidate on this ballot by name.
    pub fn candidate(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    pub fn candidate_mut(&mut self, name: &str) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.name == name)
    }

    /// The names on the ballot, in ballot order.
    pub fn candidate_names(&self) -> Vec<CandidateId> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    /// Total accepted votes across all candidates.
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.votes).sum()
    }

    /// Derive the phase of this election at the given instant.
    ///
    /// The phase is never stored; no clock-driven transition exists, so it
    /// is recomputed from the ballot window on every call. The window is
    /// inclusive at both ends.
    pub fn phase_at(&self, at: DateTime<Utc>) -> ElectionPhase {
        if at < self.start_time {
            ElectionPhase::Scheduled
        } else if at <= self.end_time {
            ElectionPhase::Open
        } else {
            ElectionPhase::Closed
        }
    }
}

impl Record for Election {
    const KIND: &'static str = "election";

    fn key(&self) -> &str {
        &self.id
    }
}

/// One candidate on a ballot and their running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate name, unique within the ballot.
    pub name: CandidateId,
    /// Number of accepted votes for this candidate.
    pub votes: u64,
}

/// Phases in the election lifecycle, derived from the ballot window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    /// Not yet open; the start time is in the future.
    Scheduled,
    /// Accepting votes; now lies within the ballot window.
    Open,
    /// The ballot window has passed.
    Closed,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn new_election_has_zero_tallies() {
        let election = Election::example();
        assert_eq!(2, election.candidates.len());
        assert!(election.candidates.iter().all(|c| c.votes == 0));
        assert_eq!(0, election.total_votes());
    }

    #[test]
    fn candidate_lookup_is_by_name() {
        let election = Election::example();
        assert!(election.candidate("Alice").is_some());
        assert!(election.candidate("Mallory").is_none());
    }

    #[test]
    fn phase_is_derived_from_the_ballot_window() {
        let election = Election::example();
        assert_eq!(ElectionPhase::Scheduled, election.phase_at(at(999)));
        assert_eq!(ElectionPhase::Open, election.phase_at(at(1000)));
        assert_eq!(ElectionPhase::Open, election.phase_at(at(1500)));
        assert_eq!(ElectionPhase::Open, election.phase_at(at(2000)));
        assert_eq!(ElectionPhase::Closed, election.phase_at(at(2001)));
    }
}
