use hive_core::constants::limits;
use hive_core::swarm::ordered_names;
use hive_core::{Comparison, DispatchResult, SupervisorOutcome, SwarmOutcome};
use std::fmt::Write;

pub const RULE: &str = "========================================";

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub fn supervisor(outcome: &SupervisorOutcome) -> String {
    let assigned = outcome
        .assigned
        .map(|r| r.name().to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut out = String::new();
    let _ = writeln!(out, "Task type: {}", outcome.task_type);
    let _ = writeln!(out, "Assigned worker: {assigned}");
    let _ = writeln!(out, "Elapsed: {:.2}s", outcome.elapsed.as_secs_f64());
    let _ = writeln!(out, "Result:\n{}", outcome.result);
    out
}

/// One line per worker, known roles first in canonical order.
pub fn worker_lines(results: &DispatchResult) -> Vec<String> {
    ordered_names(results)
        .into_iter()
        .filter_map(|name| results.get(name).map(|outcome| (name, outcome)))
        .map(|(name, outcome)| match outcome.output() {
            Some(output) => format!("  {name}: {}", preview(output, limits::PREVIEW_CHARS)),
            None => format!(
                "  {name}: FAILED ({})",
                outcome.failure_reason().unwrap_or_default()
            ),
        })
        .collect()
}

pub fn swarm(outcome: &SwarmOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Parallel step: {:.2}s ({} workers, {} failed)",
        outcome.parallel_elapsed.as_secs_f64(),
        outcome.parallel_results.len(),
        outcome.parallel_results.failure_count()
    );
    let _ = writeln!(out, "Worker views:");
    for line in worker_lines(&outcome.parallel_results) {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "\nConsensus:\n{}", outcome.consensus);
    let _ = writeln!(out, "Total: {:.2}s", outcome.elapsed.as_secs_f64());
    out
}

pub fn comparison(cmp: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Sequential: {:.2}s ({} failed)",
        cmp.sequential.elapsed.as_secs_f64(),
        cmp.sequential.result.failure_count()
    );
    let _ = writeln!(
        out,
        "Concurrent: {:.2}s ({} failed)",
        cmp.concurrent.elapsed.as_secs_f64(),
        cmp.concurrent.result.failure_count()
    );
    match cmp.speedup() {
        Some(speedup) => {
            let _ = writeln!(out, "Speedup: {speedup:.2}x");
        }
        None => {
            let _ = writeln!(out, "Speedup: n/a");
        }
    }
    let _ = writeln!(out, "Time saved: {:.2}s", cmp.saved().as_secs_f64());
    out
}
