use crate::dispatch::{DispatchResult, Dispatcher};
use crate::error::Result;
use std::time::Duration;
use tokio::time::Instant;

/// A dispatch result together with its wall-clock time.
#[derive(Debug, Clone)]
pub struct Timed {
    pub elapsed: Duration,
    pub result: DispatchResult,
}

/// Sequential baseline vs concurrent fan-out over the same workers.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub sequential: Timed,
    pub concurrent: Timed,
}

impl Comparison {
    /// `sequential / concurrent`, or `None` when the concurrent run took no
    /// measurable time.
    pub fn speedup(&self) -> Option<f64> {
        let concurrent = self.concurrent.elapsed.as_secs_f64();
        if concurrent > 0.0 {
            Some(self.sequential.elapsed.as_secs_f64() / concurrent)
        } else {
            None
        }
    }

    pub fn saved(&self) -> Duration {
        self.sequential
            .elapsed
            .saturating_sub(self.concurrent.elapsed)
    }
}

/// Run the sequential baseline first, then the concurrent dispatch.
pub async fn compare(dispatcher: &Dispatcher, input: &str) -> Result<Comparison> {
    let started = Instant::now();
    let result = dispatcher.dispatch_sequential(input).await?;
    let sequential = Timed {
        elapsed: started.elapsed(),
        result,
    };

    let started = Instant::now();
    let result = dispatcher.dispatch(input).await?;
    let concurrent = Timed {
        elapsed: started.elapsed(),
        result,
    };

    tracing::info!(
        sequential_ms = sequential.elapsed.as_millis() as u64,
        concurrent_ms = concurrent.elapsed.as_millis() as u64,
        "comparison finished"
    );

    Ok(Comparison {
        sequential,
        concurrent,
    })
}
