//! EM engine configuration.

use crate::error::{Error, Result};

/// Knobs of the seeded multinomial EM fit.
///
/// Defaults reproduce the fixed constants of the reference behavior:
/// additive smoothing `1e-4`, stopping delta `1e-4`, at most 100 passes,
/// and 400-bit mantissas (about 120 significant decimal digits).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmConfig {
    /// Added to the numerator of every word likelihood (never the denominator).
    pub epsilon: f64,
    /// Stop once the posterior log-sum moves by less than this.
    pub convergence_threshold: f64,
    /// Iteration cap; the loop index runs from 1 while below this value.
    pub max_iterations: usize,
    /// Mantissa bits of the extended-precision probabilities.
    pub precision_bits: usize,
}

impl EmConfig {
    /// Smallest accepted mantissa width.
    pub const MIN_PRECISION_BITS: usize = 64;

    /// Default configuration.
    pub fn new() -> Self {
        Self {
            epsilon: 1e-4,
            convergence_threshold: 1e-4,
            max_iterations: 100,
            precision_bits: 400,
        }
    }

    /// Set the additive smoothing term.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the stopping delta.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the mantissa width in bits.
    pub fn with_precision_bits(mut self, bits: usize) -> Self {
        self.precision_bits = bits;
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and >= 0",
            });
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(Error::InvalidParameter {
                name: "convergence_threshold",
                message: "must be finite and >= 0",
            });
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                message: "must be > 0",
            });
        }
        if self.precision_bits < Self::MIN_PRECISION_BITS {
            return Err(Error::InvalidParameter {
                name: "precision_bits",
                message: "must be >= 64",
            });
        }
        Ok(())
    }
}

impl Default for EmConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EmConfig::default();
        assert_eq!(config.epsilon, 1e-4);
        assert_eq!(config.convergence_threshold, 1e-4);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.precision_bits, 400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_epsilon_is_allowed() {
        assert!(EmConfig::new().with_epsilon(0.0).validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            EmConfig::new().with_epsilon(-1e-3),
            EmConfig::new().with_epsilon(f64::NAN),
            EmConfig::new().with_convergence_threshold(f64::INFINITY),
            EmConfig::new().with_max_iterations(0),
            EmConfig::new().with_precision_bits(53),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidParameter { .. })),
                "{config:?}"
            );
        }
    }
}
