//! Multi-commodity flow instance generator and IP-versus-CP solve harness.
//!
//! - **Network**: seeded generation of connected directed networks with
//!   per-edge capacities, per-commodity costs and exactly balanced
//!   supply/demand, plus an advisory feasibility report.
//! - **Formulation**: one technology-agnostic min-cost flow model shared by
//!   both engines.
//! - **IP**: the formulation handed to `good_lp` (pure-Rust `microlp`
//!   backend) as an integer program.
//! - **CP**: integer bounds propagation with depth-first objective-cut
//!   search.
//! - **Adapter**: the [`FlowSolver`](adapter::FlowSolver) contract that
//!   normalizes both engines into one result taxonomy.
//! - **Harness**: runs cases through both engines under a shared timeout
//!   and reports speed and solution quality.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use u_mcflow::harness::{CaseSpec, ComparisonHarness, HarnessConfig};
//!
//! let harness = ComparisonHarness::new(HarnessConfig::default().with_seed(1));
//! let report = harness.run(&[CaseSpec::new("Tiny", 5, 10, 1)], Some(Duration::from_secs(10)));
//! assert_eq!(report.summary.failed, 0);
//! ```
//!
//! # Architecture
//!
//! Everything runs synchronously on the calling thread, except that the IP
//! backend solves on a worker thread so the adapter can stop waiting at the
//! deadline. All randomness comes from one seeded RNG per instance, and the
//! library installs no `tracing` subscriber.

pub mod adapter;
pub mod cp;
pub mod formulation;
pub mod harness;
pub mod network;
