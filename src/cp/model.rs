//! CP model definition.

use super::variables::IntVar;
use std::collections::HashMap;

/// A constraint in the CP model.
///
/// Constraints refer to variables by name. Coefficients are integers;
/// the solver reasons over integer bounds only.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Linear inequality: `Σ coeff·var <= rhs`.
    LessEqual {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, i64)>,
        /// Right-hand side.
        rhs: i64,
    },

    /// Linear equality: `Σ coeff·var == rhs`.
    Equal {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, i64)>,
        /// Right-hand side.
        rhs: i64,
    },
}

impl Constraint {
    /// Variable/coefficient pairs of the constraint.
    pub fn terms(&self) -> &[(String, i64)] {
        match self {
            Constraint::LessEqual { terms, .. } | Constraint::Equal { terms, .. } => terms,
        }
    }
}

/// Objective function for the CP model.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize a linear combination of integer variables.
    Minimize {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, i64)>,
    },

    /// Maximize a linear combination of integer variables.
    Maximize {
        /// (variable_name, coefficient) pairs.
        terms: Vec<(String, i64)>,
    },
}

impl Objective {
    pub fn terms(&self) -> &[(String, i64)] {
        match self {
            Objective::Minimize { terms } | Objective::Maximize { terms } => terms,
        }
    }
}

/// A constraint programming model.
///
/// Contains variables, constraints, and an optional objective function.
/// Variables keep their insertion order, which is also the solver's
/// tie-breaking order.
///
/// # Examples
///
/// ```
/// use u_mcflow::cp::{CpModel, IntVar, Objective};
///
/// let mut model = CpModel::new("example");
/// model.add_int_var(IntVar::new("x", 0, 10));
/// model.add_int_var(IntVar::new("y", 0, 10));
/// model.add_equal(vec![("x".into(), 1), ("y".into(), 1)], 7);
/// model.set_objective(Objective::Minimize {
///     terms: vec![("x".into(), 2), ("y".into(), 3)],
/// });
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Integer variables in insertion order.
    pub int_vars: Vec<IntVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Objective function.
    pub objective: Option<Objective>,
    index: HashMap<String, usize>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an integer variable. A variable with the same name is replaced.
    pub fn add_int_var(&mut self, var: IntVar) {
        match self.index.get(&var.name) {
            Some(&i) => self.int_vars[i] = var,
            None => {
                self.index.insert(var.name.clone(), self.int_vars.len());
                self.int_vars.push(var);
            }
        }
    }

    /// Position of a variable in [`CpModel::int_vars`].
    pub fn var_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Convenience: add a `<=` constraint.
    pub fn add_less_equal(&mut self, terms: Vec<(String, i64)>, rhs: i64) {
        self.constraints.push(Constraint::LessEqual { terms, rhs });
    }

    /// Convenience: add an `==` constraint.
    pub fn add_equal(&mut self, terms: Vec<(String, i64)>, rhs: i64) {
        self.constraints.push(Constraint::Equal { terms, rhs });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variable names exist and that every
    /// domain is non-empty.
    pub fn validate(&self) -> Result<(), String> {
        for var in &self.int_vars {
            if var.is_empty() {
                return Err(format!(
                    "empty domain for {}: [{}, {}]",
                    var.name, var.min, var.max
                ));
            }
        }
        for constraint in &self.constraints {
            for (name, _) in constraint.terms() {
                if !self.index.contains_key(name) {
                    return Err(format!("undefined variable: {name}"));
                }
            }
        }
        if let Some(objective) = &self.objective {
            for (name, _) in objective.terms() {
                if !self.index.contains_key(name) {
                    return Err(format!("undefined objective variable: {name}"));
                }
            }
        }
        Ok(())
    }

    /// Returns the number of integer variables.
    pub fn var_count(&self) -> usize {
        self.int_vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
