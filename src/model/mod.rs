mod election;
mod event;
mod member;
mod vote;

pub use election::{Candidate, Election, ElectionPhase};
pub use event::{Event, NewElectionEvent, NewVoteEvent};
pub use member::Member;
pub use vote::Vote;

/// Our member IDs are caller-assigned strings.
pub type MemberId = String;
/// Our election IDs are caller-assigned strings.
pub type ElectionId = String;
/// Our vote IDs are caller-assigned strings.
pub type VoteId = String;
/// Our candidate IDs (names) are strings.
pub type CandidateId = String;
