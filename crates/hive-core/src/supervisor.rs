//! Supervisor flow: classify a request, then delegate it to exactly one
//! specialist worker.

use crate::constants::messages;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::search::SearchClient;
use crate::worker::{role_workers, Worker, WorkerRole};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Where the supervisor sends a classified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Assign(WorkerRole),
    Finish,
}

#[derive(Debug, Clone)]
pub struct SupervisorOutcome {
    pub run_id: Uuid,
    /// Classifier reply, trimmed and lower-cased.
    pub task_type: String,
    pub assigned: Option<WorkerRole>,
    pub result: String,
    pub steps: u32,
    pub elapsed: Duration,
}

pub struct Supervisor {
    llm: Arc<dyn LlmClient>,
    workers: HashMap<WorkerRole, Arc<dyn Worker>>,
    timeout: Option<Duration>,
}

impl Supervisor {
    pub fn new(llm: Arc<dyn LlmClient>, workers: HashMap<WorkerRole, Arc<dyn Worker>>) -> Self {
        Self {
            llm,
            workers,
            timeout: None,
        }
    }

    /// Deadline for the assigned worker. `None` lets it run to completion.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Supervisor over the four LLM role workers.
    pub fn from_roles(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchClient>) -> Self {
        let workers = role_workers(Arc::clone(&llm), search).into_iter().collect();
        Self::new(llm, workers)
    }

    /// Ask the LLM for a single role keyword.
    pub async fn classify(&self, input: &str) -> Result<String> {
        let reply = self.llm.complete(&classification_prompt(input)).await?;
        Ok(reply.trim().to_lowercase())
    }

    pub fn route(task_type: &str) -> Route {
        match WorkerRole::from_keyword(task_type) {
            Some(role) => Route::Assign(role),
            None => Route::Finish,
        }
    }

    pub async fn run(&self, input: &str) -> Result<SupervisorOutcome> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("supervisor", %run_id);
        self.run_inner(run_id, input).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, input: &str) -> Result<SupervisorOutcome> {
        let started = Instant::now();

        let task_type = self.classify(input).await?;
        let mut steps = 1;
        tracing::info!(%task_type, "request classified");

        let assigned = match Self::route(&task_type) {
            Route::Assign(role) if self.workers.contains_key(&role) => Some(role),
            Route::Assign(role) => {
                tracing::warn!(%role, "no worker registered for role");
                None
            }
            Route::Finish => None,
        };

        let result = match assigned.and_then(|role| self.workers.get(&role).map(|w| (role, w))) {
            Some((role, worker)) => {
                steps += 1;
                self.run_assigned(role, worker.as_ref(), input).await
            }
            None => messages::UNSUPPORTED_TASK.to_string(),
        };

        Ok(SupervisorOutcome {
            run_id,
            task_type,
            assigned,
            result,
            steps,
            elapsed: started.elapsed(),
        })
    }

    /// Worker output, or a description of why it produced none.
    async fn run_assigned(&self, role: WorkerRole, worker: &dyn Worker, input: &str) -> String {
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, worker.run(input)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(%role, ?limit, "assigned worker timed out");
                    return format!("{role} worker timed out after {limit:?}");
                }
            },
            None => worker.run(input).await,
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(%role, "assigned worker failed: {e}");
            format!("{role} worker failed: {e}")
        })
    }
}

fn classification_prompt(input: &str) -> String {
    let options = WorkerRole::all()
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a task dispatcher. Decide which specialist should handle the user's request.\n\n\
         User request: {input}\n\n\
         Specialists:\n\
         - research: searching for information, looking things up, gathering data\n\
         - analysis: analyzing, comparing, evaluating, summarizing\n\
         - creative: writing, content creation, design, ideas\n\
         - technical: implementation, programming, system design\n\n\
         Reply with exactly one keyword: {options}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_known_and_unknown() {
        assert_eq!(Supervisor::route("research"), Route::Assign(WorkerRole::Research));
        assert_eq!(Supervisor::route("technical."), Route::Assign(WorkerRole::Technical));
        assert_eq!(Supervisor::route("gardening"), Route::Finish);
        assert_eq!(Supervisor::route(""), Route::Finish);
    }

    #[test]
    fn test_classification_prompt_lists_every_role() {
        let prompt = classification_prompt("write a poem");
        assert!(prompt.contains("User request: write a poem"));
        assert!(prompt.contains("research, analysis, creative, technical"));
    }
}
