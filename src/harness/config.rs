//! Harness configuration.

use super::types::CaseSpec;
use std::time::Duration;

/// Shared settings for every case of a comparison run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_mcflow::harness::HarnessConfig;
///
/// let config = HarnessConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Per-engine time budget when `run` is given none.
    pub timeout: Duration,
    /// Upper end of the edge capacity ranges.
    pub max_capacity: i64,
    /// Seed used to generate every case's instance.
    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_capacity: 100,
            seed: 42,
        }
    }
}

impl HarnessConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: i64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The small, medium and large cases of the reference experiment.
    pub fn default_cases() -> Vec<CaseSpec> {
        vec![
            CaseSpec::new("Small", 8, 16, 2),
            CaseSpec::new("Medium", 12, 28, 3),
            CaseSpec::new("Large", 15, 40, 4),
        ]
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_capacity < 0 {
            return Err(format!(
                "max_capacity must be non-negative, got {}",
                self.max_capacity
            ));
        }
        Ok(())
    }
}
