//! Random connected network topology.
//!
//! # Algorithm
//!
//! 1. Random spanning tree: node `i` attaches to a uniform parent in `[0, i)`,
//!    both directions added, capacity in `[0.8·max, max]`
//! 2. Augmentation: uniform node pairs not yet connected, both directions
//!    added, capacity in `[0.6·max, max]`, until the edge target is met or
//!    `3 × needed` draws are spent
//! 3. Each logical connection draws one cost vector with entries in `[1, 5]`,
//!    shared by its two directions

use super::config::InstanceConfig;
use super::types::Edge;
use rand::Rng;
use std::collections::HashSet;

/// Lowest unit cost drawn for an edge.
pub const MIN_COST: i64 = 1;
/// Highest unit cost drawn for an edge.
pub const MAX_COST: i64 = 5;

/// `value * n / 10` rounded down, without overflowing for large `value`.
fn tenths(value: i64, n: i64) -> i64 {
    value / 10 * n + value % 10 * n / 10
}

/// Builds the directed edge list for `config`, drawing from `rng`.
pub fn generate_edges<R: Rng>(config: &InstanceConfig, rng: &mut R) -> Vec<Edge> {
    let n = config.node_count;
    let k = config.commodity_count;
    let max_capacity = config.max_capacity;

    let mut edges = Vec::with_capacity(config.edge_count.max(2 * n.saturating_sub(1)));
    let mut present: HashSet<(usize, usize)> = HashSet::new();

    let tree_low = tenths(max_capacity, 8);
    for i in 1..n {
        let parent = rng.random_range(0..i);
        let capacity = rng.random_range(tree_low..=max_capacity);
        let costs = draw_costs(k, rng);
        push_pair(&mut edges, &mut present, parent, i, capacity, costs);
    }

    let target = config.edge_count.min(config.max_edges());
    let needed = target.saturating_sub(edges.len());
    let max_attempts = needed * 3;
    let extra_low = tenths(max_capacity, 6);

    let mut added = 0;
    let mut attempts = 0;
    while added < needed && attempts < max_attempts {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        if u != v && !present.contains(&(u, v)) {
            let capacity = rng.random_range(extra_low..=max_capacity);
            let costs = draw_costs(k, rng);
            push_pair(&mut edges, &mut present, u, v, capacity, costs);
            added += 2;
        }
        attempts += 1;
    }

    if added < needed {
        tracing::debug!(
            target,
            actual = edges.len(),
            attempts,
            "edge target not reached"
        );
    }

    edges
}

fn draw_costs<R: Rng>(commodity_count: usize, rng: &mut R) -> Vec<i64> {
    (0..commodity_count)
        .map(|_| rng.random_range(MIN_COST..=MAX_COST))
        .collect()
}

// Both directions share the capacity and cost vector.
fn push_pair(
    edges: &mut Vec<Edge>,
    present: &mut HashSet<(usize, usize)>,
    u: usize,
    v: usize,
    capacity: i64,
    costs: Vec<i64>,
) {
    edges.push(Edge::new(u, v, capacity, costs.clone()));
    edges.push(Edge::new(v, u, capacity, costs));
    present.insert((u, v));
    present.insert((v, u));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ProblemInstance;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn edges_for(config: &InstanceConfig) -> Vec<Edge> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        generate_edges(config, &mut rng)
    }

    #[test]
    fn test_spanning_tree_only() {
        let config = InstanceConfig::new(6, 0, 2);
        let edges = edges_for(&config);
        assert_eq!(edges.len(), 10);
    }

    #[test]
    fn test_tree_capacity_range() {
        let config = InstanceConfig::new(10, 0, 1).with_max_capacity(100);
        for edge in edges_for(&config) {
            assert!((80..=100).contains(&edge.capacity), "got {}", edge.capacity);
        }
    }

    #[test]
    fn test_augmented_capacity_range() {
        let config = InstanceConfig::new(10, 60, 1).with_max_capacity(100);
        for edge in edges_for(&config) {
            assert!((60..=100).contains(&edge.capacity), "got {}", edge.capacity);
        }
    }

    #[test]
    fn test_reaches_target() {
        let config = InstanceConfig::new(8, 16, 2);
        let edges = edges_for(&config);
        assert!(edges.len() >= 14);
        assert!(edges.len() <= 17);
    }

    #[test]
    fn test_directions_share_costs() {
        let config = InstanceConfig::new(8, 30, 3);
        let edges = edges_for(&config);
        for pair in edges.chunks(2) {
            assert_eq!(pair[0].from, pair[1].to);
            assert_eq!(pair[0].to, pair[1].from);
            assert_eq!(pair[0].capacity, pair[1].capacity);
            assert_eq!(pair[0].costs, pair[1].costs);
        }
    }

    #[test]
    fn test_no_duplicate_arcs() {
        let config = InstanceConfig::new(6, 30, 1).with_seed(3);
        let edges = edges_for(&config);
        let unique: HashSet<(usize, usize)> = edges.iter().map(|e| (e.from, e.to)).collect();
        assert_eq!(unique.len(), edges.len());
        assert!(edges.iter().all(|e| e.from != e.to));
    }

    #[test]
    fn test_unreachable_target_terminates() {
        // 3 nodes allow at most 6 directed edges.
        let config = InstanceConfig::new(3, 1000, 1);
        let edges = edges_for(&config);
        assert!(edges.len() >= 4);
        assert!(edges.len() <= 6);
    }

    #[test]
    fn test_tenths() {
        assert_eq!(tenths(100, 8), 80);
        assert_eq!(tenths(7, 6), 4);
        assert_eq!(tenths(i64::MAX, 8), (i64::MAX as i128 * 8 / 10) as i64);
    }

    #[test]
    fn test_extreme_capacity() {
        let config = InstanceConfig::new(6, 20, 1).with_max_capacity(i64::MAX);
        for edge in edges_for(&config) {
            assert!(edge.capacity >= tenths(i64::MAX, 6));
        }
    }

    #[test]
    fn test_zero_capacity() {
        let config = InstanceConfig::new(5, 12, 1).with_max_capacity(0);
        assert!(edges_for(&config).iter().all(|e| e.capacity == 0));
    }

    proptest! {
        #[test]
        fn prop_connected_and_bounded(
            n in 2usize..25,
            m in 0usize..80,
            k in 1usize..5,
            seed in any::<u64>(),
        ) {
            let config = InstanceConfig::new(n, m, k).with_seed(seed);
            let instance = ProblemInstance::generate(&config).unwrap();

            prop_assert!(instance.is_connected());
            prop_assert!(instance.edge_count() >= 2 * (n - 1));
            for edge in instance.edges() {
                prop_assert!(edge.capacity >= 0);
                prop_assert_eq!(edge.costs.len(), k);
                for &c in &edge.costs {
                    prop_assert!((MIN_COST..=MAX_COST).contains(&c));
                }
            }
        }

        #[test]
        fn prop_deterministic(
            n in 2usize..20,
            m in 0usize..60,
            k in 1usize..4,
            cap in 0i64..200,
            seed in any::<u64>(),
        ) {
            let config = InstanceConfig::new(n, m, k)
                .with_max_capacity(cap)
                .with_seed(seed);
            let a = ProblemInstance::generate(&config).unwrap();
            let b = ProblemInstance::generate(&config).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
