//! Per-commodity routing cost lower bounds.

use super::types::{FlowModel, RowKind};
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};

impl FlowModel {
    /// Lower bound on each commodity's cost, ignoring shared capacity.
    ///
    /// Every unit delivered to a sink travels at least the shortest-path
    /// distance from the nearest source, over edges with positive capacity.
    /// Sinks no source can reach contribute nothing. `None` for a commodity
    /// with a negative unit cost.
    pub fn commodity_lower_bounds(&self) -> Vec<Option<i64>> {
        (0..self.commodity_count)
            .map(|k| self.commodity_lower_bound(k))
            .collect()
    }

    fn commodity_lower_bound(&self, commodity: usize) -> Option<i64> {
        let arcs: Vec<_> = self
            .variables
            .iter()
            .filter(|v| v.commodity == commodity)
            .collect();
        if arcs.iter().any(|v| v.cost < 0) {
            return None;
        }

        let mut graph: DiGraph<(), i64> = DiGraph::with_capacity(self.node_count + 1, arcs.len());
        let nodes: Vec<NodeIndex> = (0..self.node_count).map(|_| graph.add_node(())).collect();
        let super_source = graph.add_node(());
        for arc in arcs.iter().filter(|v| v.upper > 0) {
            graph.add_edge(nodes[arc.from], nodes[arc.to], arc.cost);
        }

        let mut sinks = Vec::new();
        for row in &self.rows {
            match row.kind {
                RowKind::Conservation { node, commodity: k } if k == commodity => {
                    if row.rhs > 0 {
                        graph.add_edge(super_source, nodes[node], 0);
                    } else if row.rhs < 0 {
                        sinks.push((nodes[node], row.rhs.saturating_neg()));
                    }
                }
                _ => {}
            }
        }

        let distance = dijkstra(&graph, super_source, None, |e| i128::from(*e.weight()));
        let bound = sinks
            .iter()
            .filter_map(|(node, demand)| {
                distance
                    .get(node)
                    .map(|d| d.saturating_mul(i128::from(*demand)))
            })
            .fold(0i128, i128::saturating_add);
        Some(i64::try_from(bound).unwrap_or(i64::MAX))
    }
}
