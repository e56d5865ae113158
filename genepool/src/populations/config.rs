use super::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;
use std::time::Duration;

/// What selection does when the pool's total
/// fitness is zero (or otherwise unusable).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DegenerateSelection {
    /// Pick uniformly at random among the candidates.
    Uniform,
    /// Fail with [`EvolutionError::DegenerateSelection`].
    ///
    /// [`EvolutionError::DegenerateSelection`]: crate::EvolutionError::DegenerateSelection
    Fail,
}

/// Pauses inserted during breeding so that an observer
/// can follow selection as it happens. They never
/// affect which genomes are produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause after each offspring pair, in milliseconds.
    pub pair_interval_ms: u64,
    /// Pause after the last offspring pair, in milliseconds.
    pub settle_interval_ms: u64,
}

impl PacingConfig {
    pub fn pair_interval(&self) -> Duration {
        Duration::from_millis(self.pair_interval_ms)
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }
}

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]; this is
/// checked by [`EvolutionConfig::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of genomes in every generation.
    pub generation_size: NonZeroUsize,
    /// Top fraction of each generation copied as-is
    /// to the next. Rounded up.
    pub proportion_unchanged: f32,
    /// Fraction of each generation made of freshly
    /// randomized genomes. Rounded up, and bumped
    /// by one if needed so offspring come in pairs.
    pub new_dna_rate: f32,
    /// Chance that each child is mutated after crossover.
    pub mutation_rate: f32,
    /// Severity of child mutations.
    pub mutation_severity: f32,
    /// Whether genomes with an exact duplicate in
    /// their generation are mutated before release.
    pub mutate_clones: bool,
    /// Severity of duplicate-remediation mutations.
    pub clone_mutation_severity: f32,
    /// Selection behaviour on zero total fitness.
    pub degenerate_selection: DegenerateSelection,
    /// Observation pauses during breeding.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Seed for the run's random source. A fresh
    /// seed is drawn from the OS if absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Whether to compare each new generation against
    /// its predecessor for stagnation and clones.
    #[serde(default)]
    pub report_diagnostics: bool,
}

impl EvolutionConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, false, or in the case of
    /// `NonZeroUsize`s, 1. Degenerate selection falls
    /// back to uniform choice.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use genepool::EvolutionConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let cfg = EvolutionConfig {
    ///     // Specify some values here...
    ///     generation_size: NonZeroUsize::new(10).unwrap(),
    ///     mutation_rate: 0.05,
    ///     // Default the rest...
    ///     ..EvolutionConfig::zero()
    /// };
    /// assert!(cfg.validate().is_ok());
    /// ```
    pub const fn zero() -> EvolutionConfig {
        EvolutionConfig {
            // SAFETY: 1 is a valid NonZeroUsize.
            generation_size: unsafe { NonZeroUsize::new_unchecked(1) },
            proportion_unchanged: 0.0,
            new_dna_rate: 0.0,
            mutation_rate: 0.0,
            mutation_severity: 0.0,
            mutate_clones: false,
            clone_mutation_severity: 0.0,
            degenerate_selection: DegenerateSelection::Uniform,
            pacing: PacingConfig {
                pair_interval_ms: 0,
                settle_interval_ms: 0,
            },
            seed: None,
            report_diagnostics: false,
        }
    }

    /// Checks that probabilities lie in [0.0, 1.0]
    /// and severities are non-negative.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("proportion_unchanged", self.proportion_unchanged),
            ("new_dna_rate", self.new_dna_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("mutation_severity", self.mutation_severity),
            ("clone_mutation_severity", self.clone_mutation_severity),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::NegativeSeverity { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert_eq!(EvolutionConfig::zero().validate(), Ok(()));
    }

    #[test]
    fn rejects_probabilities() {
        let config = EvolutionConfig {
            new_dna_rate: 1.5,
            ..EvolutionConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                field: "new_dna_rate",
                value: 1.5
            })
        );

        let config = EvolutionConfig {
            mutation_rate: f32::NAN,
            ..EvolutionConfig::zero()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_severity() {
        let config = EvolutionConfig {
            clone_mutation_severity: -0.5,
            ..EvolutionConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeSeverity {
                field: "clone_mutation_severity",
                value: -0.5
            })
        );
    }

    #[test]
    fn pacing_durations() {
        let pacing = PacingConfig {
            pair_interval_ms: 100,
            settle_interval_ms: 500,
        };
        assert_eq!(pacing.pair_interval(), Duration::from_millis(100));
        assert_eq!(pacing.settle_interval(), Duration::from_millis(500));
    }
}
