//! Synthetic multi-commodity flow instances.
//!
//! Builds random connected directed networks with per-edge capacities and
//! per-commodity costs, then attaches exactly balanced supply/demand
//! vectors to every commodity.
//!
//! # Key Components
//!
//! - **Types**: [`Edge`], [`Commodity`], [`ProblemInstance`]
//! - **Config**: [`InstanceConfig`] with size, capacity range and seed
//! - **Generators**: [`generate_edges`], [`generate_commodities`]
//! - **Validator**: [`check_feasibility`], an advisory balance/capacity report
//!
//! All randomness comes from one seeded RNG passed explicitly through the
//! generators, so instances are reproducible from their config alone.

mod config;
mod demand;
mod generator;
mod types;
mod validate;

pub use config::InstanceConfig;
pub use demand::{generate_commodities, terminal_count};
pub use generator::{generate_edges, MAX_COST, MIN_COST};
pub use types::{Commodity, Edge, ProblemInstance};
pub use validate::{check_feasibility, CommodityBalance, FeasibilityReport};

/// Errors raised while generating an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid instance config: {0}")]
    InvalidConfig(String),
}
