mod lifecycle;
mod voting;

pub use lifecycle::{
    call_for_election, election_results, get_election, ElectionResults, ElectionSpec,
};
pub use voting::{cast_vote, VoteSpec};

use serde::{Deserialize, Serialize};

use crate::emitter::EventSink;
use crate::error::Result;
use crate::model::{Election, ElectionId, Vote};
use crate::registry::Ledger;

/// The closed set of transaction payloads the core accepts.
///
/// Each variant is a flat argument record; callers never submit anything
/// the engines do not have an exhaustive match arm for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transaction {
    CallForElection(ElectionSpec),
    VoteTransaction(VoteSpec),
    GetElection { election_id: ElectionId },
}

/// The success value of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    ElectionCalled(Election),
    VoteCast(Vote),
    Election(Election),
}

/// Validate and apply one transaction against the ledger.
pub fn submit(
    ledger: &Ledger,
    emitter: &dyn EventSink,
    transaction: Transaction,
) -> Result<Outcome> {
    match transaction {
        Transaction::CallForElection(spec) => {
            call_for_election(ledger, emitter, spec).map(Outcome::ElectionCalled)
        }
        Transaction::VoteTransaction(ballot) => {
            cast_vote(ledger, emitter, ballot).map(Outcome::VoteCast)
        }
        Transaction::GetElection { election_id } => {
            get_election(ledger, &election_id).map(Outcome::Election)
        }
    }
}
