//! CP variable types.

/// An integer variable with a domain [min, max].
///
/// Represents a decision variable that takes integer values within
/// the specified bounds.
#[derive(Debug, Clone)]
pub struct IntVar {
    /// Variable name (unique identifier within a model).
    pub name: String,
    /// Minimum value.
    pub min: i64,
    /// Maximum value.
    pub max: i64,
}

impl IntVar {
    /// Creates a new integer variable with the given bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Whether the domain contains no value.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_var() {
        let v = IntVar::new("x", 0, 10);
        assert_eq!((v.min, v.max), (0, 10));
        assert!(!v.is_empty());
        assert!(!IntVar::new("y", 5, 5).is_empty());
    }

    #[test]
    fn test_empty_domain() {
        assert!(IntVar::new("z", 3, 1).is_empty());
    }
}
