//! node process runner for react-docgen.
//!
//! [`DocgenRunner`] implements [`docgen_transform::DocExtractor`] by piping
//! each module through `react-docgen` in a short-lived `node` process.

mod runner;

pub use runner::{DocgenRunner, RunnerError};
