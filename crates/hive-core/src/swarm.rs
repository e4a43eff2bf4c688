//! Swarm flow: every worker answers the same request concurrently, then an
//! LLM merges their perspectives into one consensus answer.

use crate::dispatch::{DispatchResult, Dispatcher};
use crate::error::Result;
use crate::llm::LlmClient;
use crate::search::SearchClient;
use crate::worker::{role_workers, WorkerRole};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SwarmOutcome {
    pub run_id: Uuid,
    pub parallel_results: DispatchResult,
    pub consensus: String,
    pub steps: u32,
    /// Time spent in the fan-out step alone.
    pub parallel_elapsed: Duration,
    pub elapsed: Duration,
}

pub struct Swarm {
    llm: Arc<dyn LlmClient>,
    dispatcher: Dispatcher,
}

impl Swarm {
    pub fn new(llm: Arc<dyn LlmClient>, dispatcher: Dispatcher) -> Self {
        Self { llm, dispatcher }
    }

    /// Swarm over the four LLM role workers, keyed by role name.
    pub fn from_roles(
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchClient>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut dispatcher = Dispatcher::new();
        for (role, worker) in role_workers(Arc::clone(&llm), search) {
            dispatcher.register(role.name(), worker)?;
        }
        dispatcher.set_timeout(timeout);
        Ok(Self::new(llm, dispatcher))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn run(&self, input: &str) -> Result<SwarmOutcome> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("swarm", %run_id);
        self.run_inner(run_id, input).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, input: &str) -> Result<SwarmOutcome> {
        let started = Instant::now();

        let parallel_results = self.dispatcher.dispatch(input).await?;
        let parallel_elapsed = started.elapsed();

        let consensus = self
            .llm
            .complete(&consensus_prompt(input, &parallel_results))
            .await?;

        Ok(SwarmOutcome {
            run_id,
            parallel_results,
            consensus,
            steps: 2,
            parallel_elapsed,
            elapsed: started.elapsed(),
        })
    }
}

/// Text a worker contributes to the consensus prompt; failures are
/// spelled out rather than dropped.
pub fn contribution(results: &DispatchResult, name: &str) -> String {
    match results.get(name) {
        Some(outcome) => match outcome.failure_reason() {
            None => outcome.output().unwrap_or_default().to_string(),
            Some(reason) => format!("processing failed: {reason}"),
        },
        None => String::new(),
    }
}

/// Worker names with known roles first in their canonical order, then any
/// custom workers alphabetically.
pub fn ordered_names(results: &DispatchResult) -> Vec<&str> {
    let mut names: Vec<&str> = results.names().collect();
    names.sort_by_key(|name| {
        (
            WorkerRole::from_name(name)
                .and_then(|r| WorkerRole::all().iter().position(|x| *x == r))
                .unwrap_or(usize::MAX),
            name.to_string(),
        )
    });
    names
}

fn consensus_prompt(input: &str, results: &DispatchResult) -> String {
    let mut prompt = format!(
        "As the swarm coordinator, combine the views of several specialist agents.\n\n\
         User question: {input}\n\n"
    );
    for name in ordered_names(results) {
        let label = WorkerRole::from_name(name)
            .map(|r| r.perspective().to_string())
            .unwrap_or_else(|| name.to_string());
        prompt.push_str(&format!("{label} view: {}\n\n", contribution(results, name)));
    }
    prompt.push_str(
        "Synthesize these views into one balanced, comprehensive answer, including:\n\
         1. The core points of each view\n\
         2. Where they agree and disagree\n\
         3. Combined recommendations\n\
         4. An implementation path",
    );
    prompt
}
