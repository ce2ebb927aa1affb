use thiserror::Error;

use crate::model::{CandidateId, ElectionId, MemberId};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the registries and transaction engines.
///
/// Every variant is caller-recoverable: the offending transaction was
/// aborted with no partial effect and may be resubmitted with corrected
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Conflict: {kind} with ID '{id}' already exists")]
    Conflict { kind: &'static str, id: String },
    #[error("Not found: {kind} with ID '{id}'")]
    NotFound { kind: &'static str, id: String },
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Member '{0}' has already voted in this election")]
    AlreadyVoted(MemberId),
    #[error("Candidate '{candidate}' is not on the ballot for election '{election_id}'")]
    InvalidCandidate {
        candidate: CandidateId,
        election_id: ElectionId,
    },
}

impl Error {
    pub fn conflict(kind: &'static str, id: &str) -> Self {
        Self::Conflict {
            kind,
            id: id.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
