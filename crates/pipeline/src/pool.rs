//! Bounded parallel fan-out over variables.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use crate::error::PipelineError;
use crate::orchestrator::{RunContext, VariableOutcome, run_variable};

/// One variable to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTask {
    /// Internal variable name.
    pub name: String,
    /// Model output file.
    pub path: PathBuf,
}

/// Result for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReport {
    /// Internal variable name.
    pub name: String,
    /// How it ended.
    pub outcome: VariableOutcome,
}

/// Number of workers when none is configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Run every task on a pool of exactly `workers` threads.
///
/// Reports come back in task order; execution order is unspecified.
///
/// # Errors
///
/// Returns [`PipelineError::ThreadPool`] if the pool cannot be built, or
/// [`PipelineError::InvalidConfig`] for zero workers.
pub fn run_all(
    tasks: &[VariableTask],
    ctx: &RunContext<'_>,
    workers: usize,
) -> Result<Vec<VariableReport>, PipelineError> {
    if workers == 0 {
        return Err(PipelineError::InvalidConfig {
            reason: "workers must be at least 1".to_string(),
        });
    }
    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("lisagg-worker-{i}"))
        .build()
        .map_err(|e| PipelineError::ThreadPool {
            reason: e.to_string(),
        })?;

    info!(tasks = tasks.len(), workers, "starting aggregation");
    let reports = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| VariableReport {
                name: task.name.clone(),
                outcome: run_variable(&task.name, &task.path, ctx),
            })
            .collect()
    });
    Ok(reports)
}
