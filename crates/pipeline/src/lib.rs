//! Resumable native → daily → monthly → yearly aggregation of model output.
//!
//! ```text
//! run_all ──► run_variable (per variable, in parallel)
//!               ├── flux / state ──► resume_point ──► ReductionChain
//!               └── discharge ─────► rate chain (mean)
//!                                  └► rate_to_depth ──► depth chain (sum)
//! ```
//!
//! Persisted grids double as checkpoints: a rerun without overwrite picks
//! up from the coarsest grid already on disk. All file access goes through
//! the [`Store`] trait so the orchestration can be driven in memory.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `classify` | Flux / state / discharge lists |
//! | `layout` | `pp/` directory tree |
//! | `store` | [`Listing`] / [`Store`] seam and the on-disk [`FsStore`] |
//! | `resume` | [`resume_point`] |
//! | `chain` | [`ReductionChain`] |
//! | `config` | [`PipelineConfig`] |
//! | `orchestrator` | [`run_variable`] and its outcomes |
//! | `pool` | [`run_all`] worker pool |

pub mod chain;
pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod orchestrator;
pub mod pool;
pub mod resume;
pub mod store;

pub use chain::{ChainOutcome, ChainStep, ReductionChain};
pub use classify::{Classification, VariableClass};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use layout::OutputLayout;
pub use orchestrator::{RunContext, SkipReason, VariableOutcome, run_variable};
pub use pool::{VariableReport, VariableTask, default_workers, run_all};
pub use resume::resume_point;
pub use store::{FsStore, Listing, Store};
