//! Adapter for the integer programming engine, `good_lp` over the `microlp`
//! backend.
//!
//! The backend has no time limit of its own, so each solve runs on a worker
//! thread and the adapter stops waiting at the deadline. A result that
//! arrives late is dropped.

use super::types::{FlowSolver, SolveError, SolveResult, SolveStatus};
use crate::formulation::{FlowModel, IpModel};
use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const ENGINE: &str = "ip";
const BACKEND: &str = "microlp";

/// Runs a [`FlowModel`] through `good_lp`.
#[derive(Debug, Clone)]
pub struct IpFlowSolver {
    available: bool,
}

impl IpFlowSolver {
    pub fn new() -> Self {
        Self { available: true }
    }

    /// An adapter with no engine behind it. Every solve reports
    /// [`SolveStatus::Error`].
    pub fn unavailable() -> Self {
        Self { available: false }
    }
}

impl Default for IpFlowSolver {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(error: &ResolutionError) -> SolveStatus {
    match error {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Unbounded,
        _ => SolveStatus::Error,
    }
}

fn native_status(error: &ResolutionError) -> String {
    match error {
        ResolutionError::Infeasible => "infeasible".to_string(),
        ResolutionError::Unbounded => "unbounded".to_string(),
        other => other.to_string(),
    }
}

/// Solves `ip` and returns the value of every flow variable.
fn run_backend(ip: IpModel) -> Result<Vec<f64>, ResolutionError> {
    let IpModel {
        variables,
        flows,
        objective,
        constraints,
        ..
    } = ip;
    let mut problem = variables.minimise(objective).using(default_solver);
    for constraint in constraints {
        problem = problem.with(constraint);
    }
    let solution = problem.solve()?;
    Ok(flows.iter().map(|&var| solution.value(var)).collect())
}

impl FlowSolver for IpFlowSolver {
    fn name(&self) -> &str {
        ENGINE
    }

    fn solve(&self, model: &FlowModel, timeout: Duration) -> Result<SolveResult, SolveError> {
        let start = Instant::now();
        let fault = |message: String| SolveError::EngineFault {
            engine: ENGINE.to_string(),
            message,
        };
        if !self.available {
            tracing::debug!(engine = ENGINE, "engine unavailable");
            return Ok(SolveResult::new(SolveStatus::Error, None, start.elapsed())
                .with_diagnostic("native_status", "unavailable"));
        }

        let ip_model = model.to_ip_model();
        let finish = |status: SolveStatus, objective: Option<f64>, native: &str| {
            SolveResult::new(status, objective, start.elapsed())
                .with_diagnostic("native_status", native)
                .with_diagnostic("backend", BACKEND)
                .with_diagnostic("variables", model.variable_count() as u64)
                .with_diagnostic("constraints", model.row_count() as u64)
        };

        if let Some(row) = ip_model.unsatisfiable_rows.first() {
            tracing::debug!(engine = ENGINE, row = %row, "row without terms cannot hold");
            return Ok(finish(SolveStatus::Infeasible, None, "infeasible"));
        }

        let remaining = timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            return Ok(finish(SolveStatus::Error, None, "timeout"));
        }

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("u-mcflow-ip".to_string())
            .spawn(move || {
                // The receiver is gone once the deadline has passed.
                let _ = tx.send(run_backend(ip_model));
            })
            .map_err(|e| fault(format!("cannot start backend thread: {e}")))?;

        let outcome = match rx.recv_timeout(remaining) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!(engine = ENGINE, "deadline reached before backend finished");
                return Ok(finish(SolveStatus::Error, None, "timeout"));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(fault("backend thread ended without a result".to_string()));
            }
        };

        let result = match outcome {
            Ok(raw) => {
                let values: Vec<i64> = raw.iter().map(|v| v.round() as i64).collect();
                if !model.is_feasible(&values) {
                    return Err(fault("rounded solution violates the flow model".to_string()));
                }
                let objective = model.objective_value(&values) as f64;
                finish(SolveStatus::Optimal, Some(objective), "optimal")
            }
            Err(error) => finish(normalize(&error), None, &native_status(&error)),
        };

        tracing::debug!(
            engine = ENGINE,
            status = %result.status,
            objective = ?result.objective,
            elapsed = result.elapsed_seconds,
            "solve finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Commodity, Edge, InstanceConfig, ProblemInstance};

    fn path_model() -> FlowModel {
        let edges = vec![
            Edge::new(0, 1, 20, vec![1]),
            Edge::new(1, 2, 20, vec![1]),
            Edge::new(2, 3, 20, vec![1]),
        ];
        let commodities = vec![Commodity::new(0, vec![10, 0, 0, -10])];
        FlowModel::formulate(&ProblemInstance::from_parts(4, edges, commodities))
    }

    #[test]
    fn test_path_optimal() {
        let result = IpFlowSolver::new()
            .solve(&path_model(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!((result.objective.unwrap() - 30.0).abs() < 1e-6);
        assert_eq!(result.count("variables"), Some(3));
        assert_eq!(result.count("constraints"), Some(3 + 4));
        assert_eq!(result.diagnostics["backend"].to_string(), "microlp");
        assert!(result.elapsed_seconds >= 0.0);
    }

    #[test]
    fn test_contested_edge() {
        let edges = vec![
            Edge::new(0, 1, 8, vec![1, 1]),
            Edge::new(0, 2, 10, vec![3, 2]),
            Edge::new(2, 1, 10, vec![1, 2]),
        ];
        let commodities = vec![
            Commodity::new(0, vec![6, -6, 0]),
            Commodity::new(1, vec![5, -5, 0]),
        ];
        let model = FlowModel::formulate(&ProblemInstance::from_parts(3, edges, commodities));
        let result = IpFlowSolver::new()
            .solve(&model, Duration::from_secs(10))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective, Some(20.0));
    }

    #[test]
    fn test_infeasible_capacity() {
        let edges = vec![Edge::new(0, 1, 3, vec![1])];
        let commodities = vec![Commodity::new(0, vec![5, -5])];
        let model = FlowModel::formulate(&ProblemInstance::from_parts(2, edges, commodities));
        let result = IpFlowSolver::new()
            .solve(&model, Duration::from_secs(10))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert_eq!(result.objective, None);
    }

    #[test]
    fn test_isolated_demand_is_infeasible() {
        let instance = ProblemInstance::from_parts(
            3,
            vec![Edge::new(0, 1, 4, vec![1])],
            vec![Commodity::new(0, vec![2, -1, -1])],
        );
        let result = IpFlowSolver::new()
            .solve(&FlowModel::formulate(&instance), Duration::from_secs(10))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_zero_timeout_is_well_formed() {
        let instance = ProblemInstance::generate(&InstanceConfig::new(10, 24, 3)).unwrap();
        let model = FlowModel::formulate(&instance);
        let result = IpFlowSolver::new().solve(&model, Duration::ZERO).unwrap();

        assert_eq!(result.status, SolveStatus::Error);
        assert_eq!(result.objective, None);
        assert!(result.elapsed_seconds.is_finite());
        assert_eq!(result.diagnostics["native_status"].to_string(), "timeout");
    }

    #[test]
    fn test_unavailable() {
        let result = IpFlowSolver::unavailable()
            .solve(&path_model(), Duration::from_secs(1))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Error);
        assert_eq!(result.objective, None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&ResolutionError::Infeasible), SolveStatus::Infeasible);
        assert_eq!(normalize(&ResolutionError::Unbounded), SolveStatus::Unbounded);
        assert_eq!(normalize(&ResolutionError::Other("numerical trouble")), SolveStatus::Error);
        assert_eq!(native_status(&ResolutionError::Unbounded), "unbounded");
    }
}
