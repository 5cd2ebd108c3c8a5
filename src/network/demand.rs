//! Balanced supply/demand vectors.
//!
//! Each commodity gets a few source nodes with positive supply and a
//! disjoint set of sink nodes whose demands add up to exactly the total
//! supply. The last sink always absorbs the remainder, so the zero-sum
//! property holds by construction.

use super::types::Commodity;
use rand::seq::index;
use rand::Rng;

/// Total supply split evenly across the sources of one commodity.
const BASE_SUPPLY: i64 = 40;
/// Floor on any single source's supply.
const MIN_SOURCE_SUPPLY: i64 = 10;
/// Smallest demand drawn for a non-final sink.
const MIN_SINK_DEMAND: i64 = 5;

/// Number of sources (and sinks) used for `node_count` nodes.
///
/// `min(2, n / 3)`, raised to 1 so that two- and three-node networks still
/// carry flow.
pub fn terminal_count(node_count: usize) -> usize {
    (node_count / 3).clamp(1, 2)
}

/// Draws one balanced commodity per id in `0..commodity_count`.
///
/// `node_count` must be at least 2.
pub fn generate_commodities<R: Rng>(
    node_count: usize,
    commodity_count: usize,
    rng: &mut R,
) -> Vec<Commodity> {
    (0..commodity_count)
        .map(|k| Commodity::new(k, generate_supply_demand(node_count, rng)))
        .collect()
}

fn generate_supply_demand<R: Rng>(node_count: usize, rng: &mut R) -> Vec<i64> {
    let mut supply_demand = vec![0i64; node_count];
    let terminals = terminal_count(node_count);

    let sources = index::sample(rng, node_count, terminals).into_vec();
    let remaining: Vec<usize> = (0..node_count).filter(|n| !sources.contains(n)).collect();
    let sinks: Vec<usize> = index::sample(rng, remaining.len(), terminals.min(remaining.len()))
        .into_vec()
        .into_iter()
        .map(|i| remaining[i])
        .collect();

    let per_source = BASE_SUPPLY / sources.len() as i64;
    let mut total_supply = 0;
    for &node in &sources {
        let supply = (per_source + rng.random_range(-5..=10)).max(MIN_SOURCE_SUPPLY);
        supply_demand[node] = supply;
        total_supply += supply;
    }

    let Some((&last, rest)) = sinks.split_last() else {
        return supply_demand;
    };

    if rest.is_empty() {
        supply_demand[last] = -total_supply;
    } else {
        let mut remaining_demand = total_supply;
        for (i, &node) in rest.iter().enumerate() {
            let sinks_after = (sinks.len() - i - 1) as i64;
            let max_demand = (remaining_demand - sinks_after * MIN_SINK_DEMAND)
                .min(remaining_demand / 2)
                .max(MIN_SINK_DEMAND);
            let demand = rng.random_range(MIN_SINK_DEMAND..=max_demand);
            supply_demand[node] = -demand;
            remaining_demand -= demand;
        }
        if remaining_demand > 0 {
            supply_demand[last] = -remaining_demand;
        }
    }

    let residual: i64 = supply_demand.iter().sum();
    if residual != 0 {
        tracing::debug!(residual, "correcting commodity balance on last sink");
        supply_demand[last] -= residual;
    }

    supply_demand
}
