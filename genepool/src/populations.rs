//! Populations are generations of genomes and the
//! machinery that breeds one from the previous:
//! fitness-proportional selection, elitism, fresh
//! injection, crossover, and duplicate remediation,
//! driven by the [`EvolutionController`] state machine.

mod config;
mod controller;
mod errors;
pub mod logging;
mod offspring_factory;
mod remediation;
mod selection;
mod simulation;

pub use config::{DegenerateSelection, EvolutionConfig, PacingConfig};
pub use controller::{ControllerState, EvolutionController, GenerationRecord};
pub use errors::{ConfigError, EvolutionError};
pub use offspring_factory::BreedingPlan;
pub use remediation::{RemediationReport, Remediator};
pub use selection::Selector;
pub use simulation::{
    FitnessReporter, IndividualFinished, IndividualRef, NoPause, Pacer, Simulation, ThreadSleep,
};

use crate::genomics::{Genome, GenomeError, Topology};
use logging::{HeritageCounts, Stats};

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::sync::Arc;

/// One generation: its number and its genomes,
/// in slot order.
///
/// Suports Serde for saving and resuming runs.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Population {
    generation: usize,
    topology: Arc<Topology>,
    pub(crate) genomes: Vec<Genome>,
}

impl Population {
    /// Groups `genomes` into generation `generation`.
    ///
    /// # Errors
    /// Returns an error if any genome's weights do not
    /// fit `topology`.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{Genome, Heritage, Topology};
    /// use genepool::Population;
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![1, 1]).unwrap());
    /// let mut genomes: Vec<Genome> = (0..3)
    ///     .map(|i| Genome::from_weights(&topology, vec![i as f32; 2], Heritage::New).unwrap())
    ///     .collect();
    /// genomes[1].set_fitness(2.0);
    ///
    /// let population = Population::new(1, topology, genomes).unwrap();
    /// assert_eq!(population.len(), 3);
    /// assert_eq!(population.champion().unwrap().weights(), &[1.0, 1.0]);
    /// ```
    pub fn new(
        generation: usize,
        topology: Arc<Topology>,
        genomes: Vec<Genome>,
    ) -> Result<Population, GenomeError> {
        if let Some(misfit) = genomes
            .iter()
            .find(|g| g.weights().len() != topology.parameter_count())
        {
            return Err(GenomeError::IncompatibleTopology {
                expected: topology.parameter_count(),
                found: misfit.weights().len(),
            });
        }
        Ok(Population {
            generation,
            topology,
            genomes,
        })
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Returns the fittest genome. Ties go
    /// to the earliest slot.
    pub fn champion(&self) -> Option<&Genome> {
        self.genomes.iter().reduce(|best, g| {
            match g.fitness().partial_cmp(&best.fitness()) {
                Some(Ordering::Greater) => g,
                _ => best,
            }
        })
    }

    pub fn fitness_stats(&self) -> Option<Stats> {
        Stats::from(self.genomes.iter().map(Genome::fitness))
    }

    pub fn heritage_counts(&self) -> HeritageCounts {
        HeritageCounts::of(&self.genomes)
    }

    /// Splits the population into its generation
    /// number, topology and genomes, e.g. to hand
    /// them back to [`EvolutionController::load_generation`].
    pub fn into_parts(self) -> (usize, Topology, Vec<Genome>) {
        let topology = Arc::try_unwrap(self.topology).unwrap_or_else(|shared| (*shared).clone());
        (self.generation, topology, self.genomes)
    }
}
