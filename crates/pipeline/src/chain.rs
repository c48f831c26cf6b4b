//! Generic reduction chain: resample, maybe persist, repeat.

use lisagg_aggregate::{Grid, Method, aggregate_to_grid, aggregate_to_timeseries};
use lisagg_calendar::Frequency;
use tracing::{debug, error, warn};

use crate::store::Store;

/// One step of a chain: reduce to `target` with `method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStep {
    /// Target frequency.
    pub target: Frequency,
    /// Temporal reduction.
    pub method: Method,
}

/// How a chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every step ran; `last` is the coarsest frequency produced.
    Completed {
        /// Final frequency.
        last: Frequency,
    },
    /// The step producing `at` failed; coarser steps did not run.
    Halted {
        /// Frequency that could not be produced.
        at: Frequency,
    },
}

/// A sequence of temporal reductions applied to one grid, each producing a
/// coarser grid from the previous one.
///
/// At the start frequency the chain always writes the grid's series and,
/// when asked, the grid itself. Each step then writes its series (computed from the finer
/// grid, temporal reduction first) and, when grids are saved, the reduced
/// grid. All outputs are named after the chain.
#[derive(Debug, Clone)]
pub struct ReductionChain {
    name: String,
    start: Frequency,
    steps: Vec<ChainStep>,
    spatial_methods: Vec<Method>,
    save_grids: bool,
    start_grid: bool,
}

impl ReductionChain {
    /// Chain from `start` through every coarser chain frequency, all with
    /// `method`.
    pub fn uniform(name: impl Into<String>, start: Frequency, method: Method) -> Self {
        Self::new(
            name,
            start,
            start
                .chain_after()
                .map(|target| ChainStep { target, method })
                .collect(),
        )
    }

    /// Chain with explicit steps. Never persists grids by default.
    pub fn new(name: impl Into<String>, start: Frequency, steps: Vec<ChainStep>) -> Self {
        Self {
            name: name.into(),
            start,
            steps,
            spatial_methods: vec![Method::Mean],
            save_grids: false,
            start_grid: false,
        }
    }

    /// Spatial methods used for every series.
    pub fn with_spatial_methods(mut self, methods: Vec<Method>) -> Self {
        self.spatial_methods = methods;
        self
    }

    /// Persist the grid produced by every step.
    pub fn with_save_grids(mut self, save: bool) -> Self {
        self.save_grids = save;
        self
    }

    /// Persist the start grid too (only when grids are saved).
    pub fn with_start_grid(mut self, write: bool) -> Self {
        self.start_grid = write;
        self
    }

    /// Output name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in order.
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Run the chain on `grid`, which must be at the start frequency.
    ///
    /// A failed reduction or write halts the chain; everything written
    /// before it stays on disk as a resume point.
    pub fn run(&self, grid: Grid, store: &dyn Store) -> ChainOutcome {
        let mut current = grid.with_name(self.name.clone());
        let first_method = self.steps.first().map_or(Method::Mean, |s| s.method);

        if !self.write_series(self.start, &current, first_method, store) {
            return ChainOutcome::Halted { at: self.start };
        }
        if self.save_grids && self.start_grid && !self.write_grid(self.start, &current, store) {
            return ChainOutcome::Halted { at: self.start };
        }

        for step in &self.steps {
            let Some(next) = aggregate_to_grid(Some(&current), step.target, step.method) else {
                warn!(name = %self.name, at = %step.target, "chain halted");
                return ChainOutcome::Halted { at: step.target };
            };
            if !self.write_series(step.target, &current, step.method, store) {
                return ChainOutcome::Halted { at: step.target };
            }
            if self.save_grids && !self.write_grid(step.target, &next, store) {
                return ChainOutcome::Halted { at: step.target };
            }
            debug!(
                name = %self.name,
                freq = %step.target,
                method = %step.method,
                "chain step done"
            );
            current = next;
        }

        ChainOutcome::Completed {
            last: self.steps.last().map_or(self.start, |s| s.target),
        }
    }

    fn write_series(
        &self,
        target: Frequency,
        grid: &Grid,
        method: Method,
        store: &dyn Store,
    ) -> bool {
        let series: Vec<_> =
            aggregate_to_timeseries(Some(grid), target, &self.spatial_methods, method)
                .into_values()
                .collect();
        if series.is_empty() {
            warn!(name = %self.name, freq = %target, "no series produced");
            return true;
        }
        match store.write_series(target, &self.name, &series) {
            Ok(()) => true,
            Err(e) => {
                error!(name = %self.name, freq = %target, error = %e, "series write failed");
                false
            }
        }
    }

    fn write_grid(&self, freq: Frequency, grid: &Grid, store: &dyn Store) -> bool {
        match store.write_grid(freq, grid) {
            Ok(()) => true,
            Err(e) => {
                error!(name = %self.name, freq = %freq, error = %e, "grid write failed");
                false
            }
        }
    }
}
