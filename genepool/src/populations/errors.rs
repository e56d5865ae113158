use super::controller::ControllerState;
use super::simulation::IndividualRef;
use crate::genomics::GenomeError;

use thiserror::Error;

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f32 },
    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeSeverity { field: &'static str, value: f32 },
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors that halt generation advancement.
///
/// All of these stem from misconfiguration or misuse
/// and are never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvolutionError {
    #[error("incompatible genome topologies: {expected} parameters vs {found}")]
    IncompatibleTopology { expected: usize, found: usize },
    #[error("selection needs at least {required} genomes, pool has {available}")]
    InsufficientPopulation { required: usize, available: usize },
    #[error("selection over a pool with total fitness {total_fitness}")]
    DegenerateSelection { total_fitness: f32 },
    #[error("invalid fitness {fitness} reported for {individual}")]
    InvalidFitness {
        individual: IndividualRef,
        fitness: f32,
    },
    #[error("expected a generation of {expected} genomes, got {found}")]
    PopulationSizeMismatch { expected: usize, found: usize },
    #[error("cannot {operation} while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: ControllerState,
    },
    #[error("evolution halted after an earlier error")]
    Halted,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<GenomeError> for EvolutionError {
    fn from(error: GenomeError) -> EvolutionError {
        match error {
            GenomeError::IncompatibleTopology { expected, found } => {
                EvolutionError::IncompatibleTopology { expected, found }
            }
        }
    }
}
