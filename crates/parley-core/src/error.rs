//! Error types for conversation setup and execution.

use parley_model::{ItemId, PlayerId, Subject, SubjectSetError};
use thiserror::Error;

/// Rejected conversation or player configuration. Raised before any turn runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("subject count must be at least 1")]
    NoSubjects,

    #[error("memory size must be at least 1")]
    NoMemory,

    #[error("conversation length must be at least 1")]
    ZeroLength,

    #[error("roster is empty")]
    EmptyRoster,

    #[error("player id {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),

    #[error("competition rate {0} is outside [0, 1]")]
    InvalidCompetitionRate(f64),

    #[error("planner breadth and depth must be at least 1 (breadth {breadth}, depth {depth})")]
    InvalidBreadth { breadth: usize, depth: usize },

    #[error("rival proposal rate {0} is outside [0, 1]")]
    InvalidProposalRate(f64),

    #[error("unknown player kind '{0}'")]
    UnknownPlayerKind(String),
}

/// How a proposal broke the player contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractBreach {
    #[error("item {item} is owned by {owner}")]
    NotOwner { item: ItemId, owner: PlayerId },

    #[error("item {0} is not in the proposer's memory bank")]
    NotInMemory(ItemId),

    #[error("subject {subject} is outside 0..{subjects}")]
    SubjectOutOfRange { subject: Subject, subjects: usize },

    #[error("malformed subject set: {0}")]
    MalformedSubjects(#[from] SubjectSetError),
}

/// Fatal failure while running a conversation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("{player} violated the player contract: {breach}")]
    PlayerContractViolation {
        player: PlayerId,
        breach: ContractBreach,
    },
}
