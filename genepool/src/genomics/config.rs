use crate::ConfigError;

use serde::{Deserialize, Serialize};

/// How two parents' weights are combined.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CrossoverMethod {
    /// Both parents are cut at one random index and
    /// their tails are exchanged.
    SinglePoint,
    /// Each index is independently exchanged
    /// between the children with even odds.
    Uniform,
}

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Magnitude bound of the uniform distribution
    /// new genomes draw their weights from.
    pub weight_bound: f32,
    /// Chance of each weight being perturbed during
    /// a mutation. At least one weight is always perturbed.
    pub gene_mutation_chance: f32,
    /// Crossover operator used for breeding.
    pub crossover: CrossoverMethod,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, and crossover is single-point.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::GeneticConfig;
    ///
    /// let cfg = GeneticConfig {
    ///     weight_bound: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            weight_bound: 0.0,
            gene_mutation_chance: 0.0,
            crossover: CrossoverMethod::SinglePoint,
        }
    }

    /// Checks that the weight bound is finite and
    /// non-negative, and the mutation chance lies
    /// in [0.0, 1.0].
    ///
    /// # Errors
    /// Returns the first offending field.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::GeneticConfig;
    ///
    /// let cfg = GeneticConfig {
    ///     weight_bound: f32::INFINITY,
    ///     ..GeneticConfig::zero()
    /// };
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.weight_bound >= 0.0 && self.weight_bound.is_finite()) {
            return Err(ConfigError::NegativeSeverity {
                field: "weight_bound",
                value: self.weight_bound,
            });
        }
        if !(0.0..=1.0).contains(&self.gene_mutation_chance) {
            return Err(ConfigError::ProbabilityOutOfRange {
                field: "gene_mutation_chance",
                value: self.gene_mutation_chance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert_eq!(GeneticConfig::zero().validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_weight_bound() {
        for weight_bound in [f32::INFINITY, f32::NEG_INFINITY, -0.5] {
            let config = GeneticConfig {
                weight_bound,
                ..GeneticConfig::zero()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::NegativeSeverity {
                    field: "weight_bound",
                    value: weight_bound
                })
            );
        }
        let config = GeneticConfig {
            weight_bound: f32::NAN,
            ..GeneticConfig::zero()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_mutation_chance_out_of_range() {
        let config = GeneticConfig {
            weight_bound: 1.0,
            gene_mutation_chance: 1.5,
            ..GeneticConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                field: "gene_mutation_chance",
                value: 1.5
            })
        );
    }
}
