//! CP solver interface and propagation-based implementation.

use super::model::{Constraint, CpModel, Objective};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded time limit without a solution.
    Timeout,
}

impl SolverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Feasible => "feasible",
            Self::Infeasible => "infeasible",
            Self::ModelInvalid => "model_invalid",
            Self::Timeout => "timeout",
        }
    }
}

/// Search counters reported with a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branching decisions taken.
    pub branches: u64,
    /// Nodes whose propagation emptied a domain.
    pub conflicts: u64,
    /// Constraint propagator invocations.
    pub propagations: u64,
    /// Improving solutions found.
    pub solutions: u64,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if any).
    pub objective_value: Option<i64>,
    /// Integer variable assignments.
    pub int_vars: HashMap<String, i64>,
    /// Search counters.
    pub stats: SearchStats,
    /// Whether the time limit stopped the search.
    pub timed_out: bool,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            int_vars: HashMap::new(),
            stats: SearchStats::default(),
            timed_out: false,
            solve_time_ms: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: i64,
    /// Stop after finding the first feasible solution.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: i64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms < 0 {
            return Err(format!(
                "time_limit_ms must be non-negative, got {}",
                self.time_limit_ms
            ));
        }
        Ok(())
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic.
/// This can wrap external solvers (e.g., OR-Tools CP-SAT) or
/// provide custom search.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// `Σ coeff·x <= rhs` over variable indices, in `i128` so that no
/// product of an `i64` coefficient and an `i64` bound can overflow.
#[derive(Debug, Clone)]
struct Linear {
    terms: Vec<(usize, i128)>,
    rhs: i128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    lo: i64,
    hi: i64,
}

impl Bounds {
    fn is_fixed(&self) -> bool {
        self.lo == self.hi
    }

    fn width(&self) -> i128 {
        i128::from(self.hi) - i128::from(self.lo)
    }
}

/// Index-based form of a validated [`CpModel`].
struct Compiled {
    constraints: Vec<Linear>,
    /// Constraints touching each variable.
    watches: Vec<Vec<usize>>,
    /// Minimization terms (maximization is negated).
    objective: Vec<(usize, i128)>,
    in_objective: Vec<bool>,
    maximize: bool,
}

impl Compiled {
    fn new(model: &CpModel) -> Self {
        let resolve = |terms: &[(String, i64)]| -> Vec<(usize, i128)> {
            terms
                .iter()
                .filter_map(|(name, c)| model.var_index(name).map(|i| (i, i128::from(*c))))
                .filter(|&(_, c)| c != 0)
                .collect()
        };

        let mut constraints = Vec::new();
        for constraint in &model.constraints {
            match constraint {
                Constraint::LessEqual { terms, rhs } => constraints.push(Linear {
                    terms: resolve(terms),
                    rhs: i128::from(*rhs),
                }),
                Constraint::Equal { terms, rhs } => {
                    let terms = resolve(terms);
                    let negated = terms.iter().map(|&(i, c)| (i, -c)).collect();
                    let rhs = i128::from(*rhs);
                    constraints.push(Linear { terms, rhs });
                    constraints.push(Linear {
                        terms: negated,
                        rhs: -rhs,
                    });
                }
            }
        }

        let mut watches = vec![Vec::new(); model.var_count()];
        for (ci, linear) in constraints.iter().enumerate() {
            for &(v, _) in &linear.terms {
                watches[v].push(ci);
            }
        }

        let (objective, maximize) = match &model.objective {
            Some(Objective::Minimize { terms }) => (resolve(terms), false),
            Some(Objective::Maximize { terms }) => (
                resolve(terms).into_iter().map(|(i, c)| (i, -c)).collect(),
                true,
            ),
            None => (Vec::new(), false),
        };
        let mut in_objective = vec![false; model.var_count()];
        for &(v, _) in &objective {
            in_objective[v] = true;
        }

        Self {
            constraints,
            watches,
            objective,
            in_objective,
            maximize,
        }
    }

    /// Runs bound propagation to a fixpoint. Returns `false` on conflict.
    ///
    /// `cut` is the objective cut `Σ obj <= best - 1`, if an incumbent exists.
    fn propagate(&self, dom: &mut [Bounds], cut: Option<&Linear>, stats: &mut SearchStats) -> bool {
        let cut_id = self.constraints.len();
        let total = cut_id + usize::from(cut.is_some());
        let mut queued = vec![true; total];
        let mut queue: VecDeque<usize> = (0..total).collect();
        let mut changed = Vec::new();

        while let Some(ci) = queue.pop_front() {
            queued[ci] = false;
            let linear = if ci == cut_id {
                match cut {
                    Some(cut) => cut,
                    None => continue,
                }
            } else {
                &self.constraints[ci]
            };

            stats.propagations += 1;
            changed.clear();
            if !propagate_linear(linear, dom, &mut changed) {
                return false;
            }

            for &v in &changed {
                for &other in &self.watches[v] {
                    if !queued[other] {
                        queued[other] = true;
                        queue.push_back(other);
                    }
                }
                if cut.is_some() && self.in_objective[v] && !queued[cut_id] {
                    queued[cut_id] = true;
                    queue.push_back(cut_id);
                }
            }
        }
        true
    }

    fn objective_value(&self, dom: &[Bounds]) -> i128 {
        self.objective
            .iter()
            .map(|&(v, c)| c * i128::from(dom[v].lo))
            .sum()
    }
}

/// Tightens bounds for one `<=` constraint, recording changed variables.
fn propagate_linear(linear: &Linear, dom: &mut [Bounds], changed: &mut Vec<usize>) -> bool {
    let min_term = |c: i128, b: Bounds| {
        if c > 0 {
            c * i128::from(b.lo)
        } else {
            c * i128::from(b.hi)
        }
    };

    let min_sum: i128 = linear.terms.iter().map(|&(v, c)| min_term(c, dom[v])).sum();
    if min_sum > linear.rhs {
        return false;
    }

    // Tightening one variable never changes another's minimum contribution.
    for &(v, c) in &linear.terms {
        let slack = linear.rhs - (min_sum - min_term(c, dom[v]));
        let b = &mut dom[v];
        if c > 0 {
            let hi = div_floor(slack, c);
            if hi < i128::from(b.hi) {
                if hi < i128::from(b.lo) {
                    return false;
                }
                // b.lo <= hi < b.hi, so the narrowing is lossless.
                b.hi = hi as i64;
                changed.push(v);
            }
        } else {
            let lo = div_ceil(slack, c);
            if lo > i128::from(b.lo) {
                if lo > i128::from(b.hi) {
                    return false;
                }
                b.lo = lo as i64;
                changed.push(v);
            }
        }
    }
    true
}

fn div_floor(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

/// Saturating conversion of an objective value back to `i64`.
fn clamp_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Bounds-propagation solver with depth-first branch-and-bound.
///
/// # Algorithm
///
/// 1. Propagate every linear constraint (and the objective cut, once an
///    incumbent exists) to a bounds fixpoint
/// 2. On a conflict, backtrack
/// 3. If every variable is fixed, record the solution and tighten the
///    objective cut to `best - 1`
/// 4. Otherwise pick the unfixed variable with the smallest domain
///    (first-fail, lowest index on ties) and bisect it, exploring the
///    lower half `x <= mid` before `x > mid`
///
/// Search ends when the tree is exhausted (optimality or infeasibility
/// proven), when the time limit expires, or after the first solution if
/// [`SolverConfig::stop_after_first`] is set. Without an objective the
/// first solution is reported as optimal.
///
/// # Examples
///
/// ```
/// use u_mcflow::cp::{CpModel, CpSolver, IntVar, Objective, PropagationSolver, SolverConfig, SolverStatus};
///
/// let mut model = CpModel::new("mix");
/// model.add_int_var(IntVar::new("x", 0, 10));
/// model.add_int_var(IntVar::new("y", 0, 10));
/// model.add_equal(vec![("x".into(), 1), ("y".into(), 1)], 7);
/// model.set_objective(Objective::Minimize {
///     terms: vec![("x".into(), 2), ("y".into(), 3)],
/// });
///
/// let solution = PropagationSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.status, SolverStatus::Optimal);
/// assert_eq!(solution.objective_value, Some(14));
/// ```
pub struct PropagationSolver;

impl PropagationSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PropagationSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for PropagationSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        if let Err(reason) = model.validate().and_then(|_| config.validate()) {
            tracing::debug!(model = %model.name, %reason, "rejecting CP model");
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start_time = Instant::now();
        let deadline = start_time
            .checked_add(Duration::from_millis(config.time_limit_ms as u64))
            .unwrap_or_else(|| start_time + Duration::from_secs(365 * 24 * 3600));
        let compiled = Compiled::new(model);
        let has_objective = model.objective.is_some();

        let root: Vec<Bounds> = model
            .int_vars
            .iter()
            .map(|v| Bounds {
                lo: v.min,
                hi: v.max,
            })
            .collect();

        let mut stats = SearchStats::default();
        let mut stack = vec![root];
        let mut best: Option<(i128, Vec<Bounds>)> = None;
        let mut cut: Option<Linear> = None;
        let mut timed_out = false;
        let mut stopped_early = false;

        while let Some(mut dom) = stack.pop() {
            if Instant::now() >= deadline {
                timed_out = true;
                break;
            }

            if !compiled.propagate(&mut dom, cut.as_ref(), &mut stats) {
                stats.conflicts += 1;
                continue;
            }

            let branch_var = dom
                .iter()
                .enumerate()
                .filter(|(_, b)| !b.is_fixed())
                .min_by_key(|&(i, b)| (b.width(), i))
                .map(|(i, _)| i);

            match branch_var {
                None => {
                    let value = compiled.objective_value(&dom);
                    stats.solutions += 1;
                    tracing::debug!(
                        objective = clamp_i64(value),
                        branches = stats.branches,
                        "CP solution"
                    );
                    best = Some((value, dom));
                    if !has_objective || config.stop_after_first {
                        stopped_early = has_objective;
                        break;
                    }
                    cut = Some(Linear {
                        terms: compiled.objective.clone(),
                        rhs: value - 1,
                    });
                }
                Some(v) => {
                    stats.branches += 1;
                    // lo <= mid < hi, so both halves are non-empty and fit in i64.
                    let mid = (i128::from(dom[v].lo) + dom[v].width() / 2) as i64;
                    let mut upper = dom.clone();
                    upper[v].lo = mid + 1;
                    dom[v].hi = mid;
                    stack.push(upper);
                    stack.push(dom);
                }
            }
        }

        let status = match (&best, timed_out || stopped_early) {
            (Some(_), false) => SolverStatus::Optimal,
            (Some(_), true) => SolverStatus::Feasible,
            (None, false) => SolverStatus::Infeasible,
            (None, true) => SolverStatus::Timeout,
        };

        let mut solution = CpSolution::empty(status);
        solution.stats = stats;
        solution.timed_out = timed_out;
        solution.solve_time_ms = start_time.elapsed().as_millis() as i64;

        if let Some((value, dom)) = best {
            if has_objective {
                solution.objective_value =
                    Some(clamp_i64(if compiled.maximize { -value } else { value }));
            }
            solution.int_vars = model
                .int_vars
                .iter()
                .zip(&dom)
                .map(|(var, b)| (var.name.clone(), b.lo))
                .collect();
        }

        solution
    }
}
