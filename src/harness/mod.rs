//! IP-versus-CP comparison runs.
//!
//! For each [`CaseSpec`] the harness generates an instance, logs its
//! feasibility report, formulates it once and solves it with the IP engine
//! and then the CP engine under the same timeout. Outcomes are collected
//! into a [`ComparisonReport`] whose `Display` renders the case-by-case
//! comparison and summary.
//!
//! A failing case (bad config, engine fault) is recorded and the run
//! continues with the next case.

mod config;
mod runner;
mod types;

pub use config::HarnessConfig;
pub use runner::ComparisonHarness;
pub use types::{CaseComparison, CaseOutcome, CaseSpec, ComparisonReport, ReportSummary};

use crate::adapter::SolveError;
use crate::network::GenerateError;

/// Reasons a single case could not be compared.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarnessError {
    #[error("invalid harness config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}
