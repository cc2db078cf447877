use std::sync::Arc;

use crate::embedding::Embedder;
use crate::rerank::Reranker;
use crate::store::CandidateStore;
use crate::telemetry::TelemetrySink;
use crate::workflow::MatchWorkflow;

/// Shared state behind every route.
///
/// Holds the workflow and telemetry sink behind `Arc`s so the state clones
/// handed to each request are cheap.
pub struct HandlerState<E, C, R> {
    pub workflow: Arc<MatchWorkflow<E, C, R>>,
    pub telemetry: Arc<TelemetrySink>,
}

impl<E, C, R> HandlerState<E, C, R>
where
    E: Embedder,
    C: CandidateStore,
    R: Reranker,
{
    pub fn new(workflow: Arc<MatchWorkflow<E, C, R>>) -> Self {
        let telemetry = workflow.telemetry().clone();
        Self {
            workflow,
            telemetry,
        }
    }
}

// Manual impl: `#[derive(Clone)]` would require E/C/R themselves to be Clone.
impl<E, C, R> Clone for HandlerState<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            workflow: self.workflow.clone(),
            telemetry: self.telemetry.clone(),
        }
    }
}
