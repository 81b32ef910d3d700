use crate::transport::{Proposal, VoteTransport};
use crate::vote::{count_votes, determine_leader, has_quorum};
use parking_lot::RwLock;
use shared::error::{ErrorKind, KernelError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub struct ElectionOutcome {
    pub leader: String,
    pub term: i64,
}

pub struct QuorumEngine<T: VoteTransport> {
    transport: Arc<T>,
    current_term: RwLock<i64>,
    voter_count: i64,
    timeout: Duration,
}

impl<T: VoteTransport> QuorumEngine<T> {
    pub fn new(transport: Arc<T>, voter_count: i64, timeout: Duration) -> Self {
        Self {
            transport,
            current_term: RwLock::new(0),
            voter_count,
            timeout,
        }
    }

    pub fn current_term(&self) -> i64 {
        *self.current_term.read()
    }

    /// Advances the term, broadcasts the proposal, collects votes bounded
    /// by the timeout or `cancel`, and decides a leader if quorum was met.
    pub async fn propose_and_decide(
        &self,
        candidate_id: &str,
        cancel: CancellationToken,
    ) -> Result<ElectionOutcome, KernelError> {
        let term = {
            let mut current = self.current_term.write();
            *current += 1;
            *current
        };

        let proposal = Proposal {
            term,
            candidate_id: candidate_id.to_string(),
        };
        self.transport.broadcast(&proposal).await?;

        let votes = tokio::select! {
            votes = self.transport.collect(term, self.timeout) => votes,
            _ = cancel.cancelled() => return Err(KernelError::cancelled()),
        };

        let counts = count_votes(&votes, term);
        let yes: i64 = counts.values().sum();
        if !has_quorum(yes, self.voter_count) {
            return Err(KernelError::new(ErrorKind::QuorumFailed, "quorum not reached"));
        }

        let leader = determine_leader(&counts);
        Ok(ElectionOutcome { leader, term })
    }
}
