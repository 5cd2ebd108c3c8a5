//! Flow model value types.

/// Relation of a [`FlowRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowSense {
    LessEqual,
    Equal,
}

/// What a row models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowKind {
    /// Joint capacity of one edge over all commodities.
    Capacity { edge: usize },
    /// Flow conservation of one commodity at one node.
    Conservation { node: usize, commodity: usize },
}

/// Flow of one commodity along one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowVar {
    pub name: String,
    pub edge: usize,
    /// Tail node of the edge.
    pub from: usize,
    /// Head node of the edge.
    pub to: usize,
    pub commodity: usize,
    /// Upper bound (the edge capacity). The lower bound is always zero.
    pub upper: i64,
    /// Unit cost in the objective.
    pub cost: i64,
}

/// A linear row `Σ coeff·flow (sense) rhs` over variable indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowRow {
    pub name: String,
    pub kind: RowKind,
    pub terms: Vec<(usize, i64)>,
    pub sense: RowSense,
    pub rhs: i64,
}

impl FlowRow {
    /// Left-hand side under `values`.
    pub fn activity(&self, values: &[i64]) -> i64 {
        self.terms.iter().map(|&(i, c)| c * values[i]).sum()
    }

    /// Whether `values` satisfies the row.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        let lhs = self.activity(values);
        match self.sense {
            RowSense::LessEqual => lhs <= self.rhs,
            RowSense::Equal => lhs == self.rhs,
        }
    }
}

/// Min-cost multi-commodity flow model shared by every engine.
///
/// Variable `flow[e][k]` lives at index `e * commodity_count + k`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowModel {
    pub name: String,
    pub(crate) node_count: usize,
    pub(crate) commodity_count: usize,
    pub(crate) variables: Vec<FlowVar>,
    pub(crate) rows: Vec<FlowRow>,
}

impl FlowModel {
    pub fn variables(&self) -> &[FlowVar] {
        &self.variables
    }

    pub fn rows(&self) -> &[FlowRow] {
        &self.rows
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn commodity_count(&self) -> usize {
        self.commodity_count
    }

    /// Index of `flow[edge][commodity]`.
    pub fn var_index(&self, edge: usize, commodity: usize) -> usize {
        edge * self.commodity_count + commodity
    }

    /// Total cost of an assignment.
    pub fn objective_value(&self, values: &[i64]) -> i64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(var, &x)| var.cost * x)
            .sum()
    }

    /// Whether `values` respects every bound and every row.
    pub fn is_feasible(&self, values: &[i64]) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(var, &x)| (0..=var.upper).contains(&x))
            && self.rows.iter().all(|row| row.is_satisfied(values))
    }
}
