pub mod election;
pub mod transport;
pub mod vote;

pub use election::{ElectionOutcome, QuorumEngine};
pub use transport::{InMemoryTransport, Proposal, VoteTransport};
pub use vote::{
    approval_ratio, byzantine_tolerance, count_votes, determine_leader, eligible_leaders,
    filter_stale, has_quorum, is_term_valid, split_brain_detected, Vote,
};
