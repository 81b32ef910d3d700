//! Transport seam for quorum proposals and vote collection.
//!
//! The kernel owns no network stack. `InMemoryTransport` is grounded on the
//! source workspace's `AlertEngine` notification pipeline — a bounded
//! `crossbeam::channel`. `submit` uses `try_send`, so a submitter on a full
//! channel gets an explicit error back rather than the vote being blocked or
//! silently dropped.

use crate::vote::Vote;
use async_trait::async_trait;
use crossbeam::channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use shared::error::KernelError;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub term: i64,
    pub candidate_id: String,
}

#[async_trait]
pub trait VoteTransport: Send + Sync {
    async fn broadcast(&self, proposal: &Proposal) -> Result<(), KernelError>;
    async fn collect(&self, term: i64, timeout: Duration) -> Vec<Vote>;
}

/// Single-process transport for colocated voters and tests: `broadcast`
/// fans a proposal out to nothing (voters observe it out of band and send
/// votes directly via [`InMemoryTransport::submit`]); `collect` drains the
/// bounded channel until `timeout` elapses.
pub struct InMemoryTransport {
    sender: Sender<Vote>,
    receiver: Receiver<Vote>,
}

impl InMemoryTransport {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    pub fn submit(&self, vote: Vote) -> Result<(), KernelError> {
        self.sender.try_send(vote).map_err(|_| {
            shared::error::KernelError::new(
                shared::error::ErrorKind::Internal,
                "vote channel full",
            )
        })
    }
}

#[async_trait]
impl VoteTransport for InMemoryTransport {
    async fn broadcast(&self, _proposal: &Proposal) -> Result<(), KernelError> {
        Ok(())
    }

    async fn collect(&self, term: i64, timeout: Duration) -> Vec<Vote> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut votes = Vec::new();
        while tokio::time::Instant::now() < deadline {
            match self.receiver.try_recv() {
                Ok(vote) if vote.term >= term => votes.push(vote),
                Ok(_) => {}
                Err(_) => {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            }
        }
        votes
    }
}
