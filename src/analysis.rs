//! Analysis runs: configuration, orchestration and report output.
pub mod config;
pub mod report;
pub mod sink;

pub use config::AnalysisConfig;
pub use report::{Analysis, AnalysisFindings, AnalysisState, ProbeOutcome, analyze, render};
pub use sink::{LazyFile, TeeWriter};
