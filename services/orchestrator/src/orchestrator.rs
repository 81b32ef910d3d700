//! Composes the control decision for a single domain request.
//!
//! Grounded on the source workspace's `MatchingEngine::submit_order`, which
//! itself documents a lock-ordering bug (an order-book lock acquired before
//! a risk lock on one path, the reverse on another) and its fix: one
//! consistent acquisition order. This orchestrator follows the analogous
//! fixed discipline — Policy, then Quorum, then Resilience-gated
//! Workflow-transition-and-append — always in that order, never re-entrant.

use crate::decision::Decision;
use chrono::Utc;
use dispatch::plan::build_plan;
use policy::{authorize, PolicyContext};
use quorum::{QuorumEngine, VoteTransport};
use resilience::{retry_backoff, CircuitBreaker};
use shared::error::{ErrorKind, KernelError};
use shared::persistence::PersistenceHandle;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use workflow::{EntityState, WorkflowEngine};

pub struct RegionPlanRequest {
    pub region: String,
    pub demand: f64,
    pub generation_before_cap: f64,
    pub cap: f64,
}

pub struct Orchestrator<P: PersistenceHandle, T: VoteTransport> {
    workflow: Arc<WorkflowEngine<P>>,
    quorum: Arc<QuorumEngine<T>>,
    breaker: Arc<CircuitBreaker>,
    retry_base_ms: u64,
    retry_max_ms: u64,
}

impl<P: PersistenceHandle, T: VoteTransport> Orchestrator<P, T> {
    pub fn new(
        workflow: Arc<WorkflowEngine<P>>,
        quorum: Arc<QuorumEngine<T>>,
        breaker: Arc<CircuitBreaker>,
        retry_base_ms: u64,
        retry_max_ms: u64,
    ) -> Self {
        Self {
            workflow,
            quorum,
            breaker,
            retry_base_ms,
            retry_max_ms,
        }
    }

    /// 1. Policy. 2. Quorum (write-class only). 3. Resilience-gated
    /// Workflow transition and append. 4. Assemble the decision.
    pub async fn handle_request(
        &self,
        ctx: &PolicyContext,
        permission: &str,
        entity: &str,
        to: EntityState,
        write_class: bool,
        plan_request: Option<RegionPlanRequest>,
        cancel: CancellationToken,
    ) -> Result<Decision, KernelError> {
        if let Err(err) = authorize(ctx, permission) {
            return Ok(Decision::denied(err.message));
        }

        let mut used_quorum = false;
        if write_class {
            let proposal_id = format!("{entity}:{to:?}");
            let outcome = self
                .quorum
                .propose_and_decide(&proposal_id, cancel.clone())
                .await?;
            if outcome.leader.is_empty() {
                return Err(KernelError::new(ErrorKind::QuorumFailed, "no leader elected"));
            }
            used_quorum = true;
        }

        let now = Utc::now();
        if !self.breaker.is_allowed(now) {
            let (_, failures, _) = self.breaker.snapshot();
            let delay = retry_backoff(self.retry_base_ms, failures, self.retry_max_ms);
            return Err(
                KernelError::new(ErrorKind::BreakerOpen, "breaker open").with_retry_after(delay)
            );
        }

        let transition_result = self.workflow.transition(entity, to).await;
        match &transition_result {
            Ok(_) => self.breaker.record_success(),
            Err(_) => self.breaker.record_failure(now),
        }
        let revision = transition_result?;

        let plan = plan_request.map(|req| {
            build_plan(&req.region, req.demand, req.generation_before_cap, req.cap)
        });
        let curtailment = plan.as_ref().map(|p| p.curtailment);

        Ok(Decision {
            authorized: true,
            reason: None,
            used_quorum,
            plan,
            events_emitted: if revision > 0 { 1 } else { 0 },
            curtailment,
            outage_priority: None,
        })
    }
}
