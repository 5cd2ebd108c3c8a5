//! Building a [`FlowModel`] from a [`ProblemInstance`].

use super::types::{FlowModel, FlowRow, FlowVar, RowKind, RowSense};
use crate::network::ProblemInstance;

impl FlowModel {
    /// Formulates `instance` as a min-cost multi-commodity flow model.
    ///
    /// Conservation rows are emitted for every (node, commodity) pair,
    /// including nodes without incident edges. Edge endpoints must be below
    /// `instance.node_count()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_mcflow::formulation::FlowModel;
    /// use u_mcflow::network::{Commodity, Edge, ProblemInstance};
    ///
    /// let instance = ProblemInstance::from_parts(
    ///     2,
    ///     vec![Edge::new(0, 1, 10, vec![3])],
    ///     vec![Commodity::new(0, vec![4, -4])],
    /// );
    /// let model = FlowModel::formulate(&instance);
    /// assert_eq!(model.variable_count(), 1);
    /// assert_eq!(model.row_count(), 1 + 2);
    /// assert!(model.is_feasible(&[4]));
    /// assert_eq!(model.objective_value(&[4]), 12);
    /// ```
    pub fn formulate(instance: &ProblemInstance) -> Self {
        let k = instance.commodity_count();
        let n = instance.node_count();
        let edges = instance.edges();

        let mut variables = Vec::with_capacity(edges.len() * k);
        for (e, edge) in edges.iter().enumerate() {
            for commodity in 0..k {
                variables.push(FlowVar {
                    name: format!("flow_e{}_k{}", e, commodity),
                    edge: e,
                    from: edge.from,
                    to: edge.to,
                    commodity,
                    upper: edge.capacity,
                    cost: edge.costs.get(commodity).copied().unwrap_or_default(),
                });
            }
        }

        let mut rows = Vec::with_capacity(edges.len() + n * k);
        for (e, edge) in edges.iter().enumerate() {
            rows.push(FlowRow {
                name: format!("cap_e{}", e),
                kind: RowKind::Capacity { edge: e },
                terms: (0..k).map(|c| (e * k + c, 1)).collect(),
                sense: RowSense::LessEqual,
                rhs: edge.capacity,
            });
        }

        for (commodity, demand) in instance.commodities().iter().enumerate() {
            let mut terms_by_node: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
            for (e, edge) in edges.iter().enumerate() {
                let var = e * k + commodity;
                terms_by_node[edge.from].push((var, 1));
                terms_by_node[edge.to].push((var, -1));
            }
            for (node, terms) in terms_by_node.into_iter().enumerate() {
                rows.push(FlowRow {
                    name: format!("balance_v{}_k{}", node, commodity),
                    kind: RowKind::Conservation { node, commodity },
                    terms,
                    sense: RowSense::Equal,
                    rhs: demand.supply_demand.get(node).copied().unwrap_or(0),
                });
            }
        }

        tracing::debug!(
            variables = variables.len(),
            rows = rows.len(),
            "formulated flow model"
        );

        Self {
            name: format!("mcflow_n{}_m{}_k{}", n, edges.len(), k),
            node_count: n,
            commodity_count: k,
            variables,
            rows,
        }
    }
}
