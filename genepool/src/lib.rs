//! A generational genetic algorithm for evolving the weights
//! of fixed-topology neural networks.
//!
//! Each generation is handed to an external [`Simulation`], which
//! runs every genome and reports back a fitness score per individual.
//! Once the whole generation has reported, the [`EvolutionController`]
//! breeds its successor: the fittest genomes are carried over, some
//! fresh random genomes are injected, and the rest is filled with
//! children of fitness-proportionally selected parent pairs.
//! Exact duplicates can then be mutated apart before the new
//! generation is released back to the simulation.
//!
//! # Example usage: evolving towards a constant target
//! ```
//! use genepool::genomics::{GeneticConfig, Genome, Topology};
//! use genepool::{EvolutionConfig, EvolutionController, IndividualRef, NoPause, Simulation};
//! use std::num::NonZeroUsize;
//!
//! /// Scores genomes by how close their weights sum to 1.
//! #[derive(Default)]
//! struct Arena {
//!     scores: Vec<f32>,
//! }
//!
//! impl Simulation for Arena {
//!     type Pose = ();
//!
//!     fn rebind_genome(&mut self, individual: IndividualRef, genome: &Genome) {
//!         self.scores.resize(individual.slot() + 1, 0.0);
//!         let sum: f32 = genome.weights().iter().sum();
//!         self.scores[individual.slot()] = 1.0 / (1.0 + (sum - 1.0).abs());
//!     }
//!
//!     fn reset_to_initial_state(&mut self, _individual: IndividualRef, _pose: &()) {}
//! }
//!
//! fn main() {
//!     let config = EvolutionConfig {
//!         generation_size: NonZeroUsize::new(20).unwrap(),
//!         proportion_unchanged: 0.1,
//!         new_dna_rate: 0.1,
//!         mutation_rate: 0.3,
//!         mutation_severity: 0.2,
//!         mutate_clones: true,
//!         clone_mutation_severity: 0.5,
//!         seed: Some(42),
//!         ..EvolutionConfig::zero()
//!     };
//!     let genetic_config = GeneticConfig {
//!         weight_bound: 1.0,
//!         gene_mutation_chance: 0.2,
//!         ..GeneticConfig::zero()
//!     };
//!     let topology = Topology::new(vec![2, 1]).unwrap();
//!
//!     let mut controller =
//!         EvolutionController::new(config, genetic_config, topology, Arena::default(), ())
//!             .unwrap()
//!             .with_pacer(NoPause);
//!     controller.seed().unwrap();
//!
//!     for _ in 0..10 {
//!         let individuals: Vec<_> = controller.individuals().collect();
//!         for individual in individuals {
//!             let fitness = controller.simulation().scores[individual.slot()];
//!             if let Err(e) = controller.individual_finished(individual, fitness) {
//!                 eprintln!("{}", e);
//!                 return;
//!             }
//!         }
//!     }
//!     assert_eq!(controller.generation(), 11);
//! }
//! ```

pub mod genomics;
mod populations;
mod rng;

pub use populations::*;
