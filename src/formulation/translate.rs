//! Translations of a [`FlowModel`] into engine models.

use super::types::{FlowModel, RowSense};
use crate::cp::{CpModel, IntVar, Objective};
use good_lp::{variable, Expression, ProblemVariables, Variable};

/// A [`FlowModel`] expressed in `good_lp` terms, ready to hand to a backend.
pub struct IpModel {
    pub variables: ProblemVariables,
    /// `flows[i]` is flow model variable `i`.
    pub flows: Vec<Variable>,
    pub objective: Expression,
    pub constraints: Vec<good_lp::Constraint>,
    /// Rows without terms whose right-hand side is not zero.
    pub unsatisfiable_rows: Vec<String>,
}

impl FlowModel {
    /// Builds the integer program: one integer variable in
    /// `[0, capacity]` per flow, capacity rows as `<=`, conservation rows as
    /// `==` and the cost objective.
    ///
    /// Rows without terms are not passed to the backend. Those that cannot
    /// hold are listed in [`IpModel::unsatisfiable_rows`].
    pub fn to_ip_model(&self) -> IpModel {
        let mut variables = ProblemVariables::new();
        let flows: Vec<Variable> = self
            .variables
            .iter()
            .map(|var| {
                variables.add(
                    variable()
                        .integer()
                        .min(0.0)
                        .max(var.upper as f64)
                        .name(var.name.clone()),
                )
            })
            .collect();

        let mut objective = Expression::with_capacity(flows.len());
        for (var, &flow) in self.variables.iter().zip(&flows) {
            objective.add_mul(var.cost as f64, flow);
        }

        let mut constraints = Vec::with_capacity(self.rows.len());
        let mut unsatisfiable_rows = Vec::new();
        for row in &self.rows {
            if row.terms.is_empty() {
                if !row.is_satisfied(&[]) {
                    unsatisfiable_rows.push(row.name.clone());
                }
                continue;
            }
            let mut lhs = Expression::with_capacity(row.terms.len());
            for &(i, c) in &row.terms {
                lhs.add_mul(c as f64, flows[i]);
            }
            let rhs = row.rhs as f64;
            constraints.push(match row.sense {
                RowSense::LessEqual => lhs.leq(rhs),
                RowSense::Equal => lhs.eq(rhs),
            });
        }

        IpModel {
            variables,
            flows,
            objective,
            constraints,
            unsatisfiable_rows,
        }
    }

    /// Builds the constraint model.
    ///
    /// Flow variables keep the flow model's names and order. One auxiliary
    /// variable `cost_k{k}` per commodity carries that commodity's cost; its
    /// lower bound is [`FlowModel::commodity_lower_bounds`] and the objective
    /// is their sum.
    pub fn to_cp_model(&self) -> CpModel {
        let mut model = CpModel::new(self.name.clone());
        for var in &self.variables {
            model.add_int_var(IntVar::new(var.name.clone(), 0, var.upper));
        }

        let named = |terms: &[(usize, i64)]| -> Vec<(String, i64)> {
            terms
                .iter()
                .map(|&(i, c)| (self.variables[i].name.clone(), c))
                .collect()
        };
        for row in &self.rows {
            match row.sense {
                RowSense::LessEqual => model.add_less_equal(named(&row.terms), row.rhs),
                RowSense::Equal => model.add_equal(named(&row.terms), row.rhs),
            }
        }

        let bounds = self.commodity_lower_bounds();
        let mut objective = Vec::with_capacity(self.commodity_count);
        for (k, bound) in bounds.into_iter().enumerate() {
            let name = format!("cost_k{k}");
            let mut terms = vec![(name.clone(), 1)];
            let (mut lo, mut hi) = (0i64, 0i64);
            for var in self.variables.iter().filter(|v| v.commodity == k) {
                let extreme = var.cost.saturating_mul(var.upper);
                if extreme < 0 {
                    lo = lo.saturating_add(extreme);
                } else {
                    hi = hi.saturating_add(extreme);
                }
                terms.push((var.name.clone(), -var.cost));
            }
            let lo = bound.map_or(lo, |b| b.clamp(lo, hi));

            model.add_int_var(IntVar::new(name.clone(), lo, hi));
            model.add_equal(terms, 0);
            objective.push((name, 1));
        }

        model.set_objective(Objective::Minimize { terms: objective });
        model
    }
}
