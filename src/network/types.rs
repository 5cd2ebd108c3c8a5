//! Value types for multi-commodity flow instances.

use super::config::InstanceConfig;
use super::demand::generate_commodities;
use super::generator::generate_edges;
use super::GenerateError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A directed arc with a shared capacity and one cost per commodity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Tail node.
    pub from: usize,
    /// Head node.
    pub to: usize,
    /// Capacity shared by all commodities.
    pub capacity: i64,
    /// Unit cost per commodity (indexed by commodity id).
    pub costs: Vec<i64>,
}

impl Edge {
    pub fn new(from: usize, to: usize, capacity: i64, costs: Vec<i64>) -> Self {
        Self {
            from,
            to,
            capacity,
            costs,
        }
    }

    /// Unit cost of routing `commodity` along this edge.
    pub fn cost(&self, commodity: usize) -> i64 {
        self.costs[commodity]
    }
}

/// One flow type with its net supply (positive) or demand (negative) per node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commodity {
    /// Commodity id.
    pub id: usize,
    /// Net supply per node, indexed by node id. Sums to zero.
    pub supply_demand: Vec<i64>,
}

impl Commodity {
    pub fn new(id: usize, supply_demand: Vec<i64>) -> Self {
        Self { id, supply_demand }
    }

    /// Sum of positive entries.
    pub fn total_supply(&self) -> i64 {
        self.supply_demand.iter().filter(|&&x| x > 0).sum()
    }

    /// Sum of negative entries (a non-positive number).
    pub fn total_demand(&self) -> i64 {
        self.supply_demand.iter().filter(|&&x| x < 0).sum()
    }

    /// Signed sum over all nodes. Zero for a balanced commodity.
    pub fn balance(&self) -> i64 {
        self.supply_demand.iter().sum()
    }
}

/// An immutable multi-commodity flow instance.
///
/// # Examples
///
/// ```
/// use u_mcflow::network::{InstanceConfig, ProblemInstance};
///
/// let config = InstanceConfig::new(8, 16, 2).with_seed(7);
/// let instance = ProblemInstance::generate(&config).unwrap();
/// assert_eq!(instance.node_count(), 8);
/// assert!(instance.edge_count() >= 14);
/// assert!(instance.commodities().iter().all(|c| c.balance() == 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemInstance {
    node_count: usize,
    edges: Vec<Edge>,
    commodities: Vec<Commodity>,
}

impl ProblemInstance {
    /// Generates a random instance from `config`.
    ///
    /// A single `StdRng` seeded with `config.seed` is threaded through the
    /// network and demand generators in that order.
    pub fn generate(config: &InstanceConfig) -> Result<Self, GenerateError> {
        config.validate().map_err(GenerateError::InvalidConfig)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let edges = generate_edges(config, &mut rng);
        let commodities =
            generate_commodities(config.node_count, config.commodity_count, &mut rng);

        tracing::debug!(
            nodes = config.node_count,
            edges = edges.len(),
            commodities = commodities.len(),
            seed = config.seed,
            "generated instance"
        );

        Ok(Self {
            node_count: config.node_count,
            edges,
            commodities,
        })
    }

    /// Assembles an instance by hand.
    ///
    /// Balance and non-negative capacities are the caller's responsibility;
    /// nothing is checked here.
    pub fn from_parts(node_count: usize, edges: Vec<Edge>, commodities: Vec<Commodity>) -> Self {
        Self {
            node_count,
            edges,
            commodities,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    pub fn commodity_count(&self) -> usize {
        self.commodities.len()
    }

    /// Whether every node is reachable from node 0 when edge directions
    /// are ignored.
    pub fn is_connected(&self) -> bool {
        if self.node_count == 0 {
            return true;
        }
        let mut adjacency = vec![Vec::new(); self.node_count];
        for edge in &self.edges {
            adjacency[edge.from].push(edge.to);
            adjacency[edge.to].push(edge.from);
        }

        let mut seen = vec![false; self.node_count];
        let mut stack = vec![0usize];
        seen[0] = true;
        while let Some(node) = stack.pop() {
            for &next in &adjacency[node] {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_instance() -> ProblemInstance {
        let edges = vec![
            Edge::new(0, 1, 20, vec![1]),
            Edge::new(1, 2, 20, vec![1]),
            Edge::new(2, 3, 20, vec![1]),
        ];
        let commodities = vec![Commodity::new(0, vec![10, 0, 0, -10])];
        ProblemInstance::from_parts(4, edges, commodities)
    }

    #[test]
    fn test_commodity_totals() {
        let c = Commodity::new(0, vec![12, -5, 0, -7]);
        assert_eq!(c.total_supply(), 12);
        assert_eq!(c.total_demand(), -12);
        assert_eq!(c.balance(), 0);
    }

    #[test]
    fn test_from_parts_accessors() {
        let instance = path_instance();
        assert_eq!(instance.node_count(), 4);
        assert_eq!(instance.edge_count(), 3);
        assert_eq!(instance.commodity_count(), 1);
        assert_eq!(instance.edges()[1].cost(0), 1);
    }

    #[test]
    fn test_connectivity_ignores_direction() {
        assert!(path_instance().is_connected());

        let split = ProblemInstance::from_parts(
            4,
            vec![Edge::new(0, 1, 5, vec![1]), Edge::new(3, 2, 5, vec![1])],
            vec![],
        );
        assert!(!split.is_connected());
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let config = InstanceConfig::new(1, 4, 1);
        assert!(matches!(
            ProblemInstance::generate(&config),
            Err(GenerateError::InvalidConfig(_))
        ));
    }
}
