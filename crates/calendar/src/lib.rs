//! # lisagg-calendar
//!
//! Frequency codes and resampling windows for gridded model output.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["dt_sec"] -->|"Frequency::from_timestep_seconds()"| B["Frequency"]
//!     C["time axis"] -->|"infer_frequency()"| B
//!     D["timestamp"] -->|"bucket_label()"| E["bucket label"]
//!     E -->|"next_label()"| E
//!     E -->|"label_sequence()"| F["Vec of labels"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use lisagg_calendar::{Frequency, bucket_label, infer_frequency};
//!
//! let native = Frequency::from_timestep_seconds(21_600)?; // 6H
//! let label = bucket_label(t, Frequency::Monthly)?;        // last day of t's month
//! let dominant = infer_frequency(&times);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frequency` | Ordered frequency codes and chain navigation |
//! | `window` | Bucket labels for fixed and calendar-bound frequencies |
//! | `sequence` | Contiguous label sequences |
//! | `infer` | Dominant-spacing inference |
//! | `error` | Error types |

mod error;
mod frequency;
mod infer;
mod sequence;
mod window;

pub use error::CalendarError;
pub use frequency::Frequency;
pub use infer::{classify_spacing, infer_frequency};
pub use sequence::label_sequence;
pub use window::{bucket_label, month_end, next_label};
