//! Comparison run loop.

use super::config::HarnessConfig;
use super::types::{CaseComparison, CaseOutcome, CaseSpec, ComparisonReport};
use super::HarnessError;
use crate::adapter::{CpFlowSolver, FlowSolver, IpFlowSolver};
use crate::formulation::FlowModel;
use crate::network::{check_feasibility, ProblemInstance};
use std::time::Duration;

/// Runs cases through an IP solver and a CP solver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_mcflow::harness::{CaseSpec, ComparisonHarness, HarnessConfig};
///
/// let harness = ComparisonHarness::new(HarnessConfig::default());
/// let report = harness.run(&[CaseSpec::new("Tiny", 4, 6, 1)], Some(Duration::from_secs(10)));
/// assert_eq!(report.summary.total, 1);
/// println!("{report}");
/// ```
pub struct ComparisonHarness {
    ip: Box<dyn FlowSolver>,
    cp: Box<dyn FlowSolver>,
    config: HarnessConfig,
}

impl ComparisonHarness {
    /// Creates a harness backed by the built-in engines.
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            ip: Box::new(IpFlowSolver::new()),
            cp: Box::new(CpFlowSolver::new()),
            config,
        }
    }

    /// Replaces both solvers.
    pub fn with_solvers(mut self, ip: Box<dyn FlowSolver>, cp: Box<dyn FlowSolver>) -> Self {
        self.ip = ip;
        self.cp = cp;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs every case in order.
    ///
    /// `timeout` applies to each engine call separately and defaults to
    /// [`HarnessConfig::timeout`]. Cases that fail are recorded as
    /// [`CaseOutcome::Failed`] and do not stop the run.
    pub fn run(&self, cases: &[CaseSpec], timeout: Option<Duration>) -> ComparisonReport {
        let timeout = timeout.unwrap_or(self.config.timeout);
        tracing::info!(
            cases = cases.len(),
            timeout_s = timeout.as_secs_f64(),
            ip = self.ip.name(),
            cp = self.cp.name(),
            "starting comparison run"
        );

        let outcomes = cases
            .iter()
            .map(|case| match self.run_case(case, timeout) {
                Ok(comparison) => CaseOutcome::Compared(Box::new(comparison)),
                Err(e) => {
                    tracing::warn!(case = %case.name, error = %e, "case failed");
                    CaseOutcome::Failed {
                        name: case.name.clone(),
                        reason: e.to_string(),
                    }
                }
            })
            .collect();

        let report = ComparisonReport::new(outcomes);
        tracing::info!(
            ip_optimal = report.summary.ip_optimal,
            cp_solved = report.summary.cp_solved,
            failed = report.summary.failed,
            "comparison run finished"
        );
        report
    }

    /// Generates, formulates and solves a single case.
    pub fn run_case(&self, case: &CaseSpec, timeout: Duration) -> Result<CaseComparison, HarnessError> {
        self.config.validate().map_err(HarnessError::InvalidConfig)?;

        tracing::info!(
            case = %case.name,
            nodes = case.node_count,
            edges = case.edge_count,
            commodities = case.commodity_count,
            "running case"
        );

        let instance = ProblemInstance::generate(
            &case.instance_config(self.config.max_capacity, self.config.seed),
        )?;
        let feasibility = check_feasibility(&instance);
        let model = FlowModel::formulate(&instance);

        let ip = self.ip.solve(&model, timeout)?;
        let cp = self.cp.solve(&model, timeout)?;

        let comparison = CaseComparison::new(case.clone(), feasibility, ip, cp);
        tracing::info!(
            case = %case.name,
            ip_status = %comparison.ip.status,
            cp_status = %comparison.cp.status,
            speedup = ?comparison.relative_speedup,
            gap_percent = ?comparison.quality_gap_percent,
            "case compared"
        );
        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{SolveError, SolveResult, SolveStatus};

    struct Faulty;

    impl FlowSolver for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }

        fn solve(&self, _model: &FlowModel, _timeout: Duration) -> Result<SolveResult, SolveError> {
            Err(SolveError::EngineFault {
                engine: "faulty".into(),
                message: "boom".into(),
            })
        }
    }

    fn tiny_cases() -> Vec<CaseSpec> {
        vec![CaseSpec::new("Tiny", 4, 6, 1), CaseSpec::new("Pair", 3, 4, 1)]
    }

    #[test]
    fn test_both_optimal_zero_gap() {
        let harness = ComparisonHarness::new(HarnessConfig::default());
        let report = harness.run(&tiny_cases(), Some(Duration::from_secs(30)));

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.failed, 0);
        for outcome in &report.outcomes {
            let c = outcome.comparison().unwrap();
            assert_eq!(c.ip.status, SolveStatus::Optimal);
            assert_eq!(c.cp.status, SolveStatus::Optimal);
            assert!(c.quality_gap_percent.unwrap().abs() < 1e-9);
            assert!(c.ip.count("variables").is_some());
            assert!(c.cp.count("branches").is_some());
        }
        assert_eq!(report.summary.ip_optimal, 2);
        assert_eq!(report.summary.cp_solved, 2);
    }

    #[test]
    fn test_failed_case_does_not_stop_run() {
        let cases = vec![CaseSpec::new("Bad", 1, 0, 1), CaseSpec::new("Tiny", 4, 6, 1)];
        let harness = ComparisonHarness::new(HarnessConfig::default());
        let report = harness.run(&cases, Some(Duration::from_secs(30)));

        assert_eq!(report.summary.failed, 1);
        assert!(matches!(report.outcomes[0], CaseOutcome::Failed { .. }));
        assert!(report.case("Tiny").is_some());
        assert!(report.case("Bad").is_none());
    }

    #[test]
    fn test_engine_fault_recorded() {
        let harness = ComparisonHarness::new(HarnessConfig::default())
            .with_solvers(Box::new(IpFlowSolver::new()), Box::new(Faulty));
        let report = harness.run(&tiny_cases(), Some(Duration::from_secs(30)));

        assert_eq!(report.summary.failed, 2);
        match &report.outcomes[0] {
            CaseOutcome::Failed { reason, .. } => assert!(reason.contains("boom")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_engine() {
        let harness = ComparisonHarness::new(HarnessConfig::default())
            .with_solvers(Box::new(IpFlowSolver::unavailable()), Box::new(CpFlowSolver::new()));
        let report = harness.run(&[CaseSpec::new("Tiny", 4, 6, 1)], Some(Duration::from_secs(30)));

        let c = report.case("Tiny").unwrap();
        assert_eq!(c.ip.status, SolveStatus::Error);
        assert_eq!(c.relative_speedup, None);
        assert_eq!(c.quality_gap_percent, None);
        assert_eq!(report.summary.cp_wins, 1);
        assert_eq!(report.summary.ip_optimal, 0);
    }

    #[test]
    fn test_invalid_config_fails_every_case() {
        let harness = ComparisonHarness::new(HarnessConfig::default().with_max_capacity(-5));
        let report = harness.run(&tiny_cases(), None);
        assert_eq!(report.summary.failed, 2);
    }

    #[test]
    fn test_zero_timeout() {
        let harness = ComparisonHarness::new(HarnessConfig::default());
        let report = harness.run(&[CaseSpec::new("Tiny", 4, 6, 1)], Some(Duration::ZERO));

        let c = report.case("Tiny").unwrap();
        assert_eq!(c.ip.status, SolveStatus::Error);
        assert_eq!(c.cp.status, SolveStatus::Error);
        assert_eq!(report.summary.ip_wins + report.summary.cp_wins, 0);
    }
}
