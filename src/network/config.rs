//! Instance generation parameters.

/// Parameters for [`ProblemInstance::generate`](super::ProblemInstance::generate).
///
/// # Examples
///
/// ```
/// use u_mcflow::network::InstanceConfig;
///
/// let config = InstanceConfig::new(12, 28, 3)
///     .with_max_capacity(150)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceConfig {
    /// Number of nodes. Must be at least 2.
    pub node_count: usize,

    /// Target number of directed edges, spanning tree included.
    ///
    /// Capped at `node_count * (node_count - 1)`. The generator may end up
    /// below the target when random sampling keeps hitting existing pairs.
    pub edge_count: usize,

    /// Number of commodities. Must be at least 1.
    pub commodity_count: usize,

    /// Upper end of the capacity ranges.
    pub max_capacity: i64,

    /// Random seed. Identical configs produce identical instances.
    pub seed: u64,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            node_count: 20,
            edge_count: 50,
            commodity_count: 5,
            max_capacity: 100,
            seed: 42,
        }
    }
}

impl InstanceConfig {
    /// Creates a config with default capacity and seed.
    pub fn new(node_count: usize, edge_count: usize, commodity_count: usize) -> Self {
        Self {
            node_count,
            edge_count,
            commodity_count,
            ..Self::default()
        }
    }

    pub fn with_max_capacity(mut self, max_capacity: i64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Upper bound on directed edges for the configured node count.
    pub fn max_edges(&self) -> usize {
        self.node_count * self.node_count.saturating_sub(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.node_count < 2 {
            return Err(format!(
                "node_count must be at least 2, got {}",
                self.node_count
            ));
        }
        if self.commodity_count == 0 {
            return Err("commodity_count must be at least 1".into());
        }
        if self.max_capacity < 0 {
            return Err(format!(
                "max_capacity must be non-negative, got {}",
                self.max_capacity
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstanceConfig::default();
        assert_eq!(config.node_count, 20);
        assert_eq!(config.edge_count, 50);
        assert_eq!(config.commodity_count, 5);
        assert_eq!(config.max_capacity, 100);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_edges() {
        assert_eq!(InstanceConfig::new(4, 0, 1).max_edges(), 12);
        assert_eq!(InstanceConfig::new(2, 0, 1).max_edges(), 2);
    }

    #[test]
    fn test_validate_too_few_nodes() {
        assert!(InstanceConfig::new(1, 10, 1).validate().is_err());
    }

    #[test]
    fn test_validate_no_commodities() {
        assert!(InstanceConfig::new(5, 10, 0).validate().is_err());
    }

    #[test]
    fn test_validate_negative_capacity() {
        let config = InstanceConfig::new(5, 10, 1).with_max_capacity(-1);
        assert!(config.validate().is_err());
    }
}
