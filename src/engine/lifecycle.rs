use chrono::{serde::ts_seconds, DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::emitter::EventSink;
use crate::error::{Error, Result};
use crate::model::{
    Candidate, CandidateId, Election, ElectionId, ElectionPhase, Event, Member, MemberId,
    NewElectionEvent,
};
use crate::registry::{Ledger, Record};

/// Validate and create a new election.
///
/// Preconditions are checked in order; the first failure aborts the
/// transaction with no effect. On success every member's `voted` flag is
/// cleared for the new cycle, the election is registered with zero
/// tallies, and a [`NewElectionEvent`] is published once the transaction
/// commits.
pub fn call_for_election(
    ledger: &Ledger,
    emitter: &dyn EventSink,
    spec: ElectionSpec,
) -> Result<Election> {
    ledger.transact(emitter, |txn| {
        if txn.exists::<Election>(&spec.election_id) {
            return Err(Error::conflict(Election::KIND, &spec.election_id));
        }

        let now = Utc::now();
        if spec.start_time < now {
            return Err(Error::InvalidTime(format!(
                "start time {} is in the past",
                spec.start_time
            )));
        }
        if spec.end_time <= spec.start_time {
            return Err(Error::InvalidTime(format!(
                "end time {} does not come after start time {}",
                spec.end_time, spec.start_time
            )));
        }

        let director = txn.get::<Member>(&spec.director)?;
        if !director.is_director {
            return Err(Error::Unauthorized(format!(
                "member '{}' is not a director",
                director.id
            )));
        }

        if spec.candidates.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "an election needs at least two candidates, got {}",
                spec.candidates.len()
            )));
        }
        for (i, name) in spec.candidates.iter().enumerate() {
            if spec.candidates[..i].contains(name) {
                return Err(Error::InvalidInput(format!(
                    "candidate '{name}' appears more than once on the ballot"
                )));
            }
        }

        // A new cycle begins: clear every member's flag before the new
        // election can accept votes.
        for mut member in txn.get_all::<Member>() {
            if member.voted {
                member.voted = false;
                txn.update(member)?;
            }
        }

        let election = Election::new(
            spec.election_id.clone(),
            spec.start_time,
            spec.end_time,
            spec.director.clone(),
            spec.candidates.clone(),
        );
        txn.add(election.clone())?;

        txn.emit(Event::NewElection(NewElectionEvent {
            start_time: election.start_time,
            end_time: election.end_time,
            candidates: election.candidate_names(),
        }));

        info!(
            "election '{}' called with {} candidates",
            election.id,
            election.candidates.len()
        );
        Ok(election)
    })
}

/// Fetch the full record of one election.
pub fn get_election(ledger: &Ledger, election_id: &str) -> Result<Election> {
    ledger.read(|txn| txn.get::<Election>(election_id))
}

/// Fetch the results readout of one election.
pub fn election_results(ledger: &Ledger, election_id: &str) -> Result<ElectionResults> {
    let election = get_election(ledger, election_id)?;

    let top = election.candidates.iter().map(|c| c.votes).max().unwrap_or(0);
    let leaders = if top == 0 {
        Vec::new()
    } else {
        election
            .candidates
            .iter()
            .filter(|c| c.votes == top)
            .map(|c| c.name.clone())
            .collect()
    };

    Ok(ElectionResults {
        election_id: election.id.clone(),
        phase: election.phase_at(Utc::now()),
        total_votes: election.total_votes(),
        leaders,
        totals: election.candidates,
    })
}

/// An election that a director wishes to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Caller-assigned unique ID for the new election.
    pub election_id: ElectionId,
    /// Start of the ballot window; must not be in the past.
    #[serde(with = "ts_seconds")]
    pub start_time: DateTime<Utc>,
    /// End of the ballot window; must come after the start.
    #[serde(with = "ts_seconds")]
    pub end_time: DateTime<Utc>,
    /// The member calling the election; must be a director.
    pub director: MemberId,
    /// Candidate names in ballot order; at least two, no duplicates.
    pub candidates: Vec<CandidateId>,
}

/// A results readout of one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub election_id: ElectionId,
    /// Phase of the election at the time of the readout.
    pub phase: ElectionPhase,
    /// Candidates with their tallies, in ballot order.
    pub totals: Vec<Candidate>,
    /// Number of accepted votes across all candidates.
    pub total_votes: u64,
    /// Candidate name(s) currently in the lead, in ballot order; empty
    /// while no votes have been accepted.
    pub leaders: Vec<CandidateId>,
}
