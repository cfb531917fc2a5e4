//! Per-key min/max/sum/count over `<key>;<reading>` files, computed by
//! parallel workers over a memory-mapped input.
//!
//! The input is mapped read-only, cut into newline-aligned chunks, parsed by
//! workers that each own a private map, and the partial maps are merged once
//! every worker has finished.

pub mod chunk;
pub mod config;
pub mod error;
pub mod line;
pub mod pipeline;
pub mod reading;
pub mod reduce;
pub mod report;
pub mod source;
pub mod stats;
pub mod worker;

pub use config::{Config, Dispatch};
pub use error::{Error, LineError};
pub use pipeline::{aggregate, aggregate_bytes, aggregate_path};
pub use reading::Reading;
pub use reduce::Measurements;
pub use stats::Statistic;
