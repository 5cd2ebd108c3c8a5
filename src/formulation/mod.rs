//! Technology-agnostic min-cost multi-commodity flow formulation.
//!
//! [`FlowModel::formulate`] turns a [`ProblemInstance`](crate::network::ProblemInstance)
//! into one shared description: a bounded integer variable per
//! (edge, commodity), a capacity row per edge, a conservation row per
//! (node, commodity) and a linear cost objective. Engines never read the
//! instance directly; they translate this description through
//! [`FlowModel::to_ip_model`] or [`FlowModel::to_cp_model`].
//!
//! # Formulation
//!
//! ```text
//! min   Σ_e Σ_k cost(e,k) · flow[e][k]
//! s.t.  Σ_k flow[e][k] <= capacity(e)                    ∀ e
//!       Σ_{e out of v} flow[e][k] − Σ_{e into v} flow[e][k] = sd[k][v]   ∀ v, k
//!       flow[e][k] ∈ {0, …, capacity(e)}
//! ```

mod bound;
mod formulate;
mod translate;
mod types;

pub use translate::IpModel;
pub use types::{FlowModel, FlowRow, FlowVar, RowKind, RowSense};
