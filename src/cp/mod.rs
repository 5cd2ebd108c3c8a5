//! Constraint Programming (CP) engine.
//!
//! Named integer variables, linear `<=`/`==` constraints and an optional
//! linear objective, solved by bounds propagation and depth-first search.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`] with a closed domain `[min, max]`
//! - **Constraints**: [`Constraint`] (`LessEqual`, `Equal`)
//! - **Model**: [`CpModel`] (container for variables, constraints, objective)
//! - **Solver**: [`CpSolver`] trait, implemented by [`PropagationSolver`]
//!
//! # Design
//!
//! The [`CpSolver`] trait allows plugging in external solvers (OR-Tools,
//! CPLEX) in place of the built-in [`PropagationSolver`]. Only generic
//! `Minimize`/`Maximize` objectives are provided.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod solver;
mod variables;

pub use model::{Constraint, CpModel, Objective};
pub use solver::{CpSolution, CpSolver, PropagationSolver, SearchStats, SolverConfig, SolverStatus};
pub use variables::IntVar;
