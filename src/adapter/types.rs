//! Normalized solve results and the solver trait.

use crate::formulation::FlowModel;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Engine-independent outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    Error,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Feasible => "FEASIBLE",
            Self::Infeasible => "INFEASIBLE",
            Self::Unbounded => "UNBOUNDED",
            Self::Error => "ERROR",
        }
    }

    /// Whether a solution (proven or not) is available.
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single engine counter or note.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Diagnostic {
    Count(u64),
    Text(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Diagnostic {
    fn from(n: u64) -> Self {
        Self::Count(n)
    }
}

impl From<&str> for Diagnostic {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Engine counters keyed by name, in sorted order.
pub type Diagnostics = BTreeMap<String, Diagnostic>;

/// Normalized result of one solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Objective of the best solution, if one exists.
    pub objective: Option<f64>,
    /// Wall-clock time including model translation.
    pub elapsed_seconds: f64,
    pub diagnostics: Diagnostics,
}

impl SolveResult {
    pub fn new(status: SolveStatus, objective: Option<f64>, elapsed: Duration) -> Self {
        Self {
            status,
            objective,
            elapsed_seconds: elapsed.as_secs_f64(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Adds a diagnostic entry.
    pub fn with_diagnostic(mut self, key: &str, value: impl Into<Diagnostic>) -> Self {
        self.diagnostics.insert(key.to_string(), value.into());
        self
    }

    /// Numeric diagnostic by key.
    pub fn count(&self, key: &str) -> Option<u64> {
        match self.diagnostics.get(key) {
            Some(Diagnostic::Count(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Faults inside an engine. Ordinary outcomes (including timeouts and
/// missing engines) are reported through [`SolveStatus`] instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("{engine} engine fault: {message}")]
    EngineFault { engine: String, message: String },
}

/// A solver that accepts the shared flow model.
pub trait FlowSolver {
    /// Short engine name used in logs and reports.
    fn name(&self) -> &str;

    /// Solves `model` within `timeout`.
    fn solve(&self, model: &FlowModel, timeout: Duration) -> Result<SolveResult, SolveError>;
}

/// Milliseconds in `timeout`, saturating.
pub(crate) fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "OPTIMAL");
        assert_eq!(SolveStatus::Error.to_string(), "ERROR");
        assert!(SolveStatus::Feasible.is_solved());
        assert!(!SolveStatus::Infeasible.is_solved());
    }

    #[test]
    fn test_diagnostics() {
        let result = SolveResult::new(SolveStatus::Optimal, Some(3.0), Duration::from_millis(1500))
            .with_diagnostic("nodes", 12u64)
            .with_diagnostic("native_status", "optimal");

        assert_eq!(result.count("nodes"), Some(12));
        assert_eq!(result.count("native_status"), None);
        assert!((result.elapsed_seconds - 1.5).abs() < 1e-9);
        assert_eq!(result.diagnostics["native_status"].to_string(), "optimal");
    }

    #[test]
    fn test_timeout_ms_saturates() {
        assert_eq!(timeout_ms(Duration::from_secs(2)), 2000);
        assert_eq!(timeout_ms(Duration::MAX), u64::MAX);
    }
}
