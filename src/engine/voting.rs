use chrono::{serde::ts_seconds, DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::emitter::EventSink;
use crate::error::{Error, Result};
use crate::model::{
    CandidateId, Election, ElectionId, ElectionPhase, Event, Member, MemberId, NewVoteEvent, Vote,
    VoteId,
};
use crate::registry::{Ledger, Record};

/// Validate and apply one vote.
///
/// All checks run against the snapshot the transaction opened on; any
/// failure aborts with zero side effects. On success the member record,
/// the vote registry and the election tally are updated as one unit, and
/// a [`NewVoteEvent`] is published once the transaction commits.
pub fn cast_vote(ledger: &Ledger, emitter: &dyn EventSink, ballot: VoteSpec) -> Result<Vote> {
    ledger.transact(emitter, |txn| {
        if txn.exists::<Vote>(&ballot.vote_id) {
            return Err(Error::conflict(Vote::KIND, &ballot.vote_id));
        }

        let mut member = txn.get::<Member>(&ballot.member_id)?;
        let mut election = txn.get::<Election>(&ballot.election_id)?;

        if election.phase_at(ballot.cast_at) != ElectionPhase::Open {
            return Err(Error::InvalidTime(format!(
                "vote cast at {} falls outside the ballot window [{}, {}]",
                ballot.cast_at, election.start_time, election.end_time
            )));
        }
        if member.voted {
            return Err(Error::AlreadyVoted(member.id));
        }
        if election.candidate(&ballot.candidate).is_none() {
            return Err(Error::InvalidCandidate {
                candidate: ballot.candidate.clone(),
                election_id: election.id.clone(),
            });
        }

        // Accepted: member flag and history, vote record and tally all
        // change in this one transaction.
        member.voted = true;
        member.election_history.push(election.id.clone());
        member.vote_history.push(ballot.candidate.clone());

        let event = NewVoteEvent {
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            election_id: election.id.clone(),
            candidate: ballot.candidate.clone(),
        };
        txn.update(member)?;

        let vote = Vote {
            id: ballot.vote_id.clone(),
            member_id: ballot.member_id.clone(),
            election_id: ballot.election_id.clone(),
            candidate: ballot.candidate.clone(),
            cast_at: ballot.cast_at,
        };
        txn.add(vote.clone())?;

        if let Some(candidate) = election.candidate_mut(&ballot.candidate) {
            candidate.votes += 1;
        }
        txn.update(election)?;

        txn.emit(Event::NewVote(event));

        info!(
            "vote '{}' accepted for candidate '{}' in election '{}'",
            vote.id, vote.candidate, vote.election_id
        );
        Ok(vote)
    })
}

/// A vote that a member wishes to cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSpec {
    /// Caller-assigned unique ID for the new vote record.
    pub vote_id: VoteId,
    /// The member casting the vote.
    pub member_id: MemberId,
    /// The election being voted in.
    pub election_id: ElectionId,
    /// Name of the candidate being voted for.
    pub candidate: CandidateId,
    /// When the vote was cast; must lie within the ballot window.
    #[serde(with = "ts_seconds")]
    pub cast_at: DateTime<Utc>,
}
