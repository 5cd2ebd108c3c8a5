//! Adapter for the constraint programming engine.

use super::types::{timeout_ms, FlowSolver, SolveError, SolveResult, SolveStatus};
use crate::cp::{CpSolution, CpSolver, PropagationSolver, SolverConfig, SolverStatus};
use crate::formulation::FlowModel;
use std::time::{Duration, Instant};

const ENGINE: &str = "cp";

/// Runs a [`FlowModel`] through a [`CpSolver`], [`PropagationSolver`] by
/// default.
pub struct CpFlowSolver {
    engine: Option<Box<dyn CpSolver>>,
    config: SolverConfig,
}

impl CpFlowSolver {
    pub fn new() -> Self {
        Self {
            engine: Some(Box::new(PropagationSolver::new())),
            config: SolverConfig::default(),
        }
    }

    /// An adapter with no engine behind it. Every solve reports
    /// [`SolveStatus::Error`].
    pub fn unavailable() -> Self {
        Self {
            engine: None,
            config: SolverConfig::default(),
        }
    }

    /// Swaps in another engine.
    pub fn with_engine(mut self, engine: Box<dyn CpSolver>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Replaces the engine configuration. The time limit is overridden by
    /// each call's timeout.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for CpFlowSolver {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(status: SolverStatus) -> SolveStatus {
    match status {
        SolverStatus::Optimal => SolveStatus::Optimal,
        SolverStatus::Feasible => SolveStatus::Feasible,
        SolverStatus::Infeasible => SolveStatus::Infeasible,
        SolverStatus::ModelInvalid | SolverStatus::Timeout => SolveStatus::Error,
    }
}

/// Reads the flow values out of `solution` and recomputes their cost.
/// Values that break a flow row are an engine fault.
fn checked_objective(model: &FlowModel, solution: &CpSolution) -> Result<i64, SolveError> {
    let fault = |message: String| SolveError::EngineFault {
        engine: ENGINE.to_string(),
        message,
    };
    let values = model
        .variables()
        .iter()
        .map(|var| {
            solution
                .int_vars
                .get(&var.name)
                .copied()
                .ok_or_else(|| fault(format!("no value for {}", var.name)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if !model.is_feasible(&values) {
        return Err(fault("solution violates the flow model".to_string()));
    }
    Ok(model.objective_value(&values))
}

impl FlowSolver for CpFlowSolver {
    fn name(&self) -> &str {
        ENGINE
    }

    fn solve(&self, model: &FlowModel, timeout: Duration) -> Result<SolveResult, SolveError> {
        let start = Instant::now();
        let Some(engine) = &self.engine else {
            tracing::debug!(engine = ENGINE, "engine unavailable");
            return Ok(SolveResult::new(SolveStatus::Error, None, start.elapsed())
                .with_diagnostic("native_status", "unavailable"));
        };

        let cp_model = model.to_cp_model();
        let limit_ms = i64::try_from(timeout_ms(timeout)).unwrap_or(i64::MAX);
        let config = self.config.clone().with_time_limit_ms(limit_ms);
        let solution = engine.solve(&cp_model, &config);

        let status = normalize(solution.status);
        let objective = if solution.is_solution_found() {
            Some(checked_objective(model, &solution)? as f64)
        } else {
            None
        };
        let stats = solution.stats;
        let result = SolveResult::new(status, objective, start.elapsed())
            .with_diagnostic("native_status", solution.status.as_str())
            .with_diagnostic("engine_ms", u64::try_from(solution.solve_time_ms).unwrap_or(0))
            .with_diagnostic("timed_out", if solution.timed_out { "true" } else { "false" })
            .with_diagnostic("branches", stats.branches)
            .with_diagnostic("conflicts", stats.conflicts)
            .with_diagnostic("propagations", stats.propagations)
            .with_diagnostic("solutions", stats.solutions);

        tracing::debug!(
            engine = ENGINE,
            status = %status,
            objective = ?solution.objective_value,
            branches = stats.branches,
            elapsed = result.elapsed_seconds,
            "solve finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::CpModel;
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

    struct GivesUp;

    impl CpSolver for GivesUp {
        fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
            CpSolution::empty(SolverStatus::Timeout)
        }
    }

    /// Claims an optimum with every variable at zero.
    struct Liar;

    impl CpSolver for Liar {
        fn solve(&self, model: &CpModel, _config: &SolverConfig) -> CpSolution {
            let mut solution = CpSolution::empty(SolverStatus::Optimal);
            solution.objective_value = Some(0);
            solution.int_vars = model.int_vars.iter().map(|v| (v.name.clone(), 0)).collect();
            solution
        }
    }

    #[test]
    fn test_path_optimal() {
        let result = CpFlowSolver::new()
            .solve(&path_model(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective, Some(30.0));
        assert!(result.count("propagations").unwrap() > 0);
        assert_eq!(result.count("solutions"), Some(1));
    }

    #[test]
    fn test_zero_timeout_is_well_formed() {
        let instance = ProblemInstance::generate(&InstanceConfig::new(10, 24, 3)).unwrap();
        let model = FlowModel::formulate(&instance);
        let result = CpFlowSolver::new().solve(&model, Duration::ZERO).unwrap();

        assert_eq!(result.status, SolveStatus::Error);
        assert_eq!(result.objective, None);
        assert!(result.elapsed_seconds.is_finite());
    }

    #[test]
    fn test_unavailable() {
        let result = CpFlowSolver::unavailable()
            .solve(&path_model(), Duration::from_secs(1))
            .unwrap();
        assert_eq!(result.status, SolveStatus::Error);
    }

    #[test]
    fn test_custom_engine() {
        let solver = CpFlowSolver::new().with_engine(Box::new(GivesUp));
        let result = solver.solve(&path_model(), Duration::from_secs(1)).unwrap();
        assert_eq!(result.status, SolveStatus::Error);
        assert_eq!(
            result.diagnostics["native_status"].to_string(),
            "timeout"
        );
    }

    #[test]
    fn test_unchecked_solution_is_fault() {
        let solver = CpFlowSolver::new().with_engine(Box::new(Liar));
        let err = solver
            .solve(&path_model(), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, SolveError::EngineFault { ref engine, .. } if engine == "cp"));
    }

    #[test]
    fn test_engine_diagnostics() {
        let result = CpFlowSolver::new()
            .solve(&path_model(), Duration::from_secs(10))
            .unwrap();
        assert!(result.count("engine_ms").is_some());
        assert_eq!(result.diagnostics["timed_out"].to_string(), "false");
    }

    #[test]
    fn test_stop_after_first_is_feasible() {
        let solver = CpFlowSolver::new()
            .with_config(SolverConfig::default().with_stop_after_first(true));
        let result = solver.solve(&path_model(), Duration::from_secs(10)).unwrap();
        assert_eq!(result.status, SolveStatus::Feasible);
        assert_eq!(result.objective, Some(30.0));
    }
}
