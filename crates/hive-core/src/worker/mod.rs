//! Worker operations: a single-input, single-output async capability.
//!
//! The dispatcher treats every worker as opaque. Adapters here turn plain
//! closures (async or blocking) into workers; [`LlmWorker`] is the
//! LLM-backed implementation used by the supervisor and swarm flows.

mod role;

pub use role::{role_workers, LlmWorker, WorkerRole};

use crate::error::{HiveError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self, input: &str) -> Result<String>;
}

type AsyncFn = dyn Fn(String) -> BoxFuture<'static, Result<String>> + Send + Sync;

/// Wraps an async closure as a [`Worker`].
pub struct FnWorker {
    f: Box<AsyncFn>,
}

impl FnWorker {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            f: Box::new(move |input| f(input).boxed()),
        }
    }
}

#[async_trait::async_trait]
impl Worker for FnWorker {
    async fn run(&self, input: &str) -> Result<String> {
        (self.f)(input.to_string()).await
    }
}

type SyncFn = dyn Fn(&str) -> Result<String> + Send + Sync;

/// Wraps a synchronous, possibly blocking closure as a [`Worker`].
///
/// Each call runs on Tokio's blocking pool so it never stalls the
/// executor threads other workers are scheduled on.
pub struct BlockingWorker {
    f: Arc<SyncFn>,
}

impl BlockingWorker {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

#[async_trait::async_trait]
impl Worker for BlockingWorker {
    async fn run(&self, input: &str) -> Result<String> {
        let f = Arc::clone(&self.f);
        let input = input.to_string();
        tokio::task::spawn_blocking(move || f(&input))
            .await
            .map_err(|e| HiveError::Other(format!("blocking worker did not finish: {e}")))?
    }
}
