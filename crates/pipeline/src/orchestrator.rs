//! Per-variable orchestration: standard chain or discharge dual path.

use std::fmt;
use std::path::Path;

use lisagg_aggregate::{CellAreas, Method, aggregate_to_grid, rate_to_depth};
use lisagg_calendar::Frequency;
use tracing::{error, info, info_span, warn};

use crate::chain::{ChainOutcome, ChainStep, ReductionChain};
use crate::classify::VariableClass;
use crate::config::PipelineConfig;
use crate::resume::resume_point;
use crate::store::Store;

/// Why a variable was not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The variable is in no classification list.
    Unclassified,
    /// Discharge variable but no cell-area grid was loaded.
    MissingAreaGrid,
    /// The source grid could not be loaded.
    LoadFailed {
        /// Loader error message.
        reason: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassified => f.write_str("not classified as flux, state or discharge"),
            Self::MissingAreaGrid => f.write_str("no cell-area grid for discharge conversion"),
            Self::LoadFailed { reason } => write!(f, "load failed: {reason}"),
        }
    }
}

/// Terminal state of one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableOutcome {
    /// Yearly output already existed; nothing recomputed.
    AlreadyDone,
    /// Every resolution was produced.
    Completed,
    /// Not processed.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
    /// The chain halted before producing `at`.
    Failed {
        /// Frequency that could not be produced.
        at: Frequency,
    },
}

impl fmt::Display for VariableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDone => f.write_str("already done"),
            Self::Completed => f.write_str("completed"),
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::Failed { at } => write!(f, "failed at {at}"),
        }
    }
}

impl From<ChainOutcome> for VariableOutcome {
    fn from(o: ChainOutcome) -> Self {
        match o {
            ChainOutcome::Completed { .. } => Self::Completed,
            ChainOutcome::Halted { at } => Self::Failed { at },
        }
    }
}

/// Read-only state every variable of a run shares.
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    /// Run configuration.
    pub config: &'a PipelineConfig,
    /// Where grids come from and products go.
    pub store: &'a dyn Store,
    /// Cell areas for discharge conversion, loaded once per run.
    pub areas: Option<&'a CellAreas>,
}

/// Process one variable end to end.
///
/// Never panics on bad data and never fails the run: every problem ends in
/// a [`VariableOutcome`] and a log line.
pub fn run_variable(name: &str, path: &Path, ctx: &RunContext<'_>) -> VariableOutcome {
    let _span = info_span!("variable", name).entered();
    let config = ctx.config;

    let outcome = match config.classification().classify(name) {
        None => VariableOutcome::Skipped {
            reason: SkipReason::Unclassified,
        },
        Some(VariableClass::Discharge) => run_discharge(name, path, ctx),
        Some(VariableClass::Flux) => run_standard(name, path, config.flux_method(), ctx),
        Some(VariableClass::State) => run_standard(name, path, config.state_method(), ctx),
    };

    match &outcome {
        VariableOutcome::Skipped { reason } => warn!(%reason, "variable skipped"),
        VariableOutcome::Failed { at } => error!(%at, "variable failed"),
        other => info!(outcome = %other, "variable finished"),
    }
    outcome
}

fn run_standard(name: &str, path: &Path, method: Method, ctx: &RunContext<'_>) -> VariableOutcome {
    let config = ctx.config;
    let native = config.native();

    let resume = if config.overwrite() {
        None
    } else {
        resume_point(name, ctx.store, native)
    };
    if resume == Some(Frequency::Yearly) {
        return VariableOutcome::AlreadyDone;
    }

    let resumed = resume.and_then(|freq| match ctx.store.load_grid(freq, name) {
        Ok(grid) => {
            info!(from = %freq, "resuming from persisted grid");
            Some((grid, freq))
        }
        Err(e) => {
            warn!(from = %freq, error = %e, "persisted grid unreadable; starting from native");
            None
        }
    });

    let (grid, start) = match resumed {
        Some(resumed) => resumed,
        None => match ctx.store.load_source(path) {
            Ok(grid) => (grid, native),
            Err(e) => {
                return VariableOutcome::Skipped {
                    reason: SkipReason::LoadFailed {
                        reason: e.to_string(),
                    },
                };
            }
        },
    };

    // The start series is rewritten from the resumed grid as well.
    ReductionChain::uniform(name, start, method)
        .with_spatial_methods(config.spatial_methods().to_vec())
        .with_save_grids(config.save_grids())
        .run(grid, ctx.store)
        .into()
}

fn run_discharge(name: &str, path: &Path, ctx: &RunContext<'_>) -> VariableOutcome {
    let config = ctx.config;
    let Some(areas) = ctx.areas else {
        return VariableOutcome::Skipped {
            reason: SkipReason::MissingAreaGrid,
        };
    };
    let depth_name = config.depth_name(name);

    if !config.overwrite()
        && ctx.store.has_grid(Frequency::Yearly, name)
        && ctx.store.has_grid(Frequency::Yearly, &depth_name)
    {
        return VariableOutcome::AlreadyDone;
    }

    let native_grid = match ctx.store.load_source(path) {
        Ok(grid) => grid,
        Err(e) => {
            return VariableOutcome::Skipped {
                reason: SkipReason::LoadFailed {
                    reason: e.to_string(),
                },
            };
        }
    };
    let native = config.native();

    // Depth path input: the daily rate.
    let daily_rate = if native == Frequency::SixHourly {
        match aggregate_to_grid(Some(&native_grid), Frequency::Daily, Method::Mean) {
            Some(g) => g,
            None => return VariableOutcome::Failed { at: Frequency::Daily },
        }
    } else {
        native_grid.clone()
    };

    // Rate path: mean at every step, un-suffixed.
    let rate = ReductionChain::uniform(name, native, Method::Mean)
        .with_spatial_methods(config.spatial_methods().to_vec())
        .with_save_grids(config.save_grids())
        .run(native_grid, ctx.store);

    // Depth path: sum from daily on, suffixed.
    let depth = match rate_to_depth(&daily_rate, areas) {
        Ok(depth_grid) => ReductionChain::new(
            depth_name,
            Frequency::Daily,
            vec![
                ChainStep {
                    target: Frequency::Monthly,
                    method: Method::Sum,
                },
                ChainStep {
                    target: Frequency::Yearly,
                    method: Method::Sum,
                },
            ],
        )
        .with_spatial_methods(config.spatial_methods().to_vec())
        .with_save_grids(config.save_grids())
        .with_start_grid(true)
        .run(depth_grid, ctx.store),
        Err(e) => {
            error!(error = %e, "depth conversion failed");
            ChainOutcome::Halted {
                at: Frequency::Daily,
            }
        }
    };

    match (rate, depth) {
        (ChainOutcome::Halted { at }, _) | (_, ChainOutcome::Halted { at }) => {
            VariableOutcome::Failed { at }
        }
        _ => VariableOutcome::Completed,
    }
}
