//! Concurrent fan-out dispatcher.
//!
//! [`Dispatcher::dispatch`] spawns one task per registered worker on the
//! ambient Tokio runtime, then waits for every one of them. It is a join,
//! not a race: a fast worker never short-circuits a slow one, and a failing
//! worker never hides the others. Failures (errors, panics, timeouts) are
//! recorded as data in the [`DispatchResult`].

mod compare;

pub use compare::{compare, Comparison, Timed};

use crate::error::{HiveError, Result};
use crate::worker::Worker;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// A named worker, immutable once registered.
#[derive(Clone)]
pub struct WorkerTask {
    name: String,
    worker: Arc<dyn Worker>,
}

impl WorkerTask {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Terminal state of a single worker within one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    Completed(String),
    /// The worker returned an error.
    Failed(String),
    /// The worker exceeded the per-worker deadline.
    TimedOut(Duration),
    Panicked(String),
}

impl WorkerOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, WorkerOutcome::Completed(_))
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            WorkerOutcome::Completed(output) => Some(output),
            _ => None,
        }
    }

    /// Human-readable failure reason, `None` for completed workers.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            WorkerOutcome::Completed(_) => None,
            WorkerOutcome::Failed(reason) => Some(reason.clone()),
            WorkerOutcome::TimedOut(limit) => Some(format!("timed out after {limit:?}")),
            WorkerOutcome::Panicked(message) => Some(format!("panicked: {message}")),
        }
    }

    fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(output) => WorkerOutcome::Completed(output),
            Err(e) => WorkerOutcome::Failed(e.to_string()),
        }
    }
}

/// Outcome of one dispatch: exactly one entry per registered worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    entries: HashMap<String, WorkerOutcome>,
}

impl DispatchResult {
    pub fn get(&self, name: &str) -> Option<&WorkerOutcome> {
        self.entries.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(WorkerOutcome::output)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WorkerOutcome)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn failure_count(&self) -> usize {
        self.entries.values().filter(|o| o.is_failure()).count()
    }

    pub fn all_completed(&self) -> bool {
        self.failure_count() == 0
    }

    fn insert(&mut self, name: String, outcome: WorkerOutcome) {
        self.entries.insert(name, outcome);
    }
}

impl IntoIterator for DispatchResult {
    type Item = (String, WorkerOutcome);
    type IntoIter = std::collections::hash_map::IntoIter<String, WorkerOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Runs a fixed set of named workers against one input.
#[derive(Clone, Default)]
pub struct Dispatcher {
    tasks: Vec<WorkerTask>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker. Names must be non-empty and unique.
    pub fn register(&mut self, name: impl Into<String>, worker: Arc<dyn Worker>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(HiveError::Config("worker name must not be empty".into()));
        }
        if self.tasks.iter().any(|t| t.name == name) {
            return Err(HiveError::Config(format!(
                "worker '{name}' is already registered"
            )));
        }
        self.tasks.push(WorkerTask { name, worker });
        Ok(())
    }

    pub fn with_worker(mut self, name: impl Into<String>, worker: Arc<dyn Worker>) -> Result<Self> {
        self.register(name, worker)?;
        Ok(self)
    }

    /// Per-worker deadline. A worker that exceeds it is recorded as
    /// [`WorkerOutcome::TimedOut`]; siblings are unaffected.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(WorkerTask::name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every worker concurrently and wait for all of them.
    ///
    /// Fails only when there are no workers or no Tokio runtime to spawn
    /// onto; individual worker failures are reported per key.
    pub async fn dispatch(&self, input: &str) -> Result<DispatchResult> {
        if self.tasks.is_empty() {
            return Err(HiveError::NoWorkers);
        }
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| HiveError::DispatchInit(e.to_string()))?;

        let started = tokio::time::Instant::now();
        tracing::info!(workers = self.tasks.len(), "dispatch started");

        let input: Arc<str> = Arc::from(input);
        let mut set = JoinSet::new();
        for task in &self.tasks {
            let name = task.name.clone();
            let worker = Arc::clone(&task.worker);
            let input = Arc::clone(&input);
            let timeout = self.timeout;
            set.spawn_on(
                async move {
                    let outcome = run_guarded(worker, &input, timeout).await;
                    (name, outcome)
                },
                &handle,
            );
        }

        let mut result = DispatchResult::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, outcome)) => {
                    log_outcome(&name, &outcome);
                    result.insert(name, outcome);
                }
                // Panics are caught inside the task, so this is only reachable
                // if the runtime cancels it. The name is filled in below.
                Err(e) => tracing::warn!("dispatch task did not finish: {e}"),
            }
        }

        for task in &self.tasks {
            if result.get(&task.name).is_none() {
                result.insert(
                    task.name.clone(),
                    WorkerOutcome::Failed("task cancelled by runtime".into()),
                );
            }
        }

        tracing::info!(
            workers = result.len(),
            failures = result.failure_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dispatch finished"
        );
        Ok(result)
    }

    /// Sequential baseline: awaits each worker in registration order.
    /// Same outcome capture and key-set guarantee as [`Self::dispatch`].
    pub async fn dispatch_sequential(&self, input: &str) -> Result<DispatchResult> {
        if self.tasks.is_empty() {
            return Err(HiveError::NoWorkers);
        }

        let mut result = DispatchResult::default();
        for task in &self.tasks {
            let outcome = run_guarded(Arc::clone(&task.worker), input, self.timeout).await;
            log_outcome(&task.name, &outcome);
            result.insert(task.name.clone(), outcome);
        }
        Ok(result)
    }
}

async fn run_guarded(
    worker: Arc<dyn Worker>,
    input: &str,
    timeout: Option<Duration>,
) -> WorkerOutcome {
    let run = AssertUnwindSafe(async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, worker.run(input)).await {
                Ok(result) => WorkerOutcome::from_result(result),
                Err(_) => WorkerOutcome::TimedOut(limit),
            },
            None => WorkerOutcome::from_result(worker.run(input).await),
        }
    });

    match run.catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => WorkerOutcome::Panicked(panic_message(payload)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn log_outcome(name: &str, outcome: &WorkerOutcome) {
    match outcome.failure_reason() {
        None => tracing::debug!(worker = name, "worker completed"),
        Some(reason) => tracing::warn!(worker = name, %reason, "worker failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let done = WorkerOutcome::Completed("ok".into());
        assert!(!done.is_failure());
        assert_eq!(done.output(), Some("ok"));
        assert_eq!(done.failure_reason(), None);

        let failed = WorkerOutcome::Failed("bad".into());
        assert!(failed.is_failure());
        assert_eq!(failed.output(), None);
        assert_eq!(failed.failure_reason().as_deref(), Some("bad"));

        let late = WorkerOutcome::TimedOut(Duration::from_secs(1));
        assert_eq!(late.failure_reason().as_deref(), Some("timed out after 1s"));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42u8)), "unknown panic payload");
    }
}
