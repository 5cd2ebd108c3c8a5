//! Advisory feasibility diagnostics.
//!
//! Nothing here rejects an instance. The report only summarizes balance and
//! aggregate capacity so that an `INFEASIBLE` solve can be explained.

use super::types::ProblemInstance;

/// Balance summary for one commodity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommodityBalance {
    pub commodity: usize,
    /// Sum of positive entries.
    pub supply: i64,
    /// Sum of negative entries.
    pub demand: i64,
    /// Signed sum; zero when balanced.
    pub balance: i64,
}

/// Aggregate diagnostics for a [`ProblemInstance`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeasibilityReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub commodities: Vec<CommodityBalance>,
    /// Sum of all edge capacities, halved since connections come in pairs.
    pub total_capacity: i64,
    /// Sum of positive supply over all commodities.
    pub total_flow_needed: i64,
}

impl FeasibilityReport {
    /// `total_capacity / total_flow_needed`, or `None` when nothing is shipped.
    pub fn capacity_ratio(&self) -> Option<f64> {
        if self.total_flow_needed > 0 {
            Some(self.total_capacity as f64 / self.total_flow_needed as f64)
        } else {
            None
        }
    }

    pub fn capacity_sufficient(&self) -> bool {
        self.total_capacity >= self.total_flow_needed
    }

    pub fn all_balanced(&self) -> bool {
        self.commodities.iter().all(|c| c.balance == 0)
    }
}

/// Computes the report for `instance` and logs it.
pub fn check_feasibility(instance: &ProblemInstance) -> FeasibilityReport {
    let commodities: Vec<CommodityBalance> = instance
        .commodities()
        .iter()
        .map(|c| CommodityBalance {
            commodity: c.id,
            supply: c.total_supply(),
            demand: c.total_demand(),
            balance: c.balance(),
        })
        .collect();

    let total_capacity = instance
        .edges()
        .iter()
        .map(|e| i128::from(e.capacity))
        .sum::<i128>()
        / 2;
    let total_capacity = i64::try_from(total_capacity).unwrap_or(i64::MAX);
    let total_flow_needed = commodities.iter().map(|c| c.supply).sum();

    let report = FeasibilityReport {
        node_count: instance.node_count(),
        edge_count: instance.edge_count(),
        commodities,
        total_capacity,
        total_flow_needed,
    };

    tracing::info!(
        nodes = report.node_count,
        edges = report.edge_count,
        commodities = report.commodities.len(),
        "problem validation"
    );
    for c in &report.commodities {
        if c.balance == 0 {
            tracing::info!(
                commodity = c.commodity,
                supply = c.supply,
                demand = c.demand,
                "commodity balanced"
            );
        } else {
            tracing::warn!(
                commodity = c.commodity,
                balance = c.balance,
                "commodity not balanced"
            );
        }
    }
    if report.capacity_sufficient() {
        tracing::info!(
            total_capacity = report.total_capacity,
            total_flow_needed = report.total_flow_needed,
            ratio = report.capacity_ratio(),
            "capacity looks sufficient"
        );
    } else {
        tracing::warn!(
            total_capacity = report.total_capacity,
            total_flow_needed = report.total_flow_needed,
            ratio = report.capacity_ratio(),
            "insufficient capacity"
        );
    }

    report
}
