//! Resume fit library: skill extraction, match scoring and gap analysis

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeFitError};
pub use processing::analyzer::{AlignmentReport, AnalysisEngine};
