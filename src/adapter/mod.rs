//! Uniform solve contract over the IP and CP engines.
//!
//! Each adapter translates a [`FlowModel`](crate::formulation::FlowModel)
//! into its engine's model, runs the engine under a wall-clock budget and
//! normalizes the native outcome into a [`SolveResult`].
//!
//! # Status mapping
//!
//! | native                         | [`SolveStatus`] |
//! |--------------------------------|-----------------|
//! | proven optimum                 | `Optimal`       |
//! | deadline hit with an incumbent | `Feasible`      |
//! | search exhausted, no solution  | `Infeasible`    |
//! | unbounded relaxation           | `Unbounded`     |
//! | anything else                  | `Error`         |

mod cp;
mod ip;
mod types;

pub use cp::CpFlowSolver;
pub use ip::IpFlowSolver;
pub use types::{Diagnostic, Diagnostics, FlowSolver, SolveError, SolveResult, SolveStatus};
