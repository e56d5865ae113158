//! Genomes are the focus of evolution.
//! They are fixed-length vectors of network weights and
//! biases, laid out according to a shared [`Topology`],
//! plus the bookkeeping needed to breed them: a fitness
//! score and a record of how they were produced.

mod config;
mod errors;
mod heritage;
mod topology;

pub use config::{CrossoverMethod, GeneticConfig};
pub use errors::GenomeError;
pub use heritage::{Colour, Heritage, HeritagePalette};
pub use topology::Topology;

use crate::rng::Bernoulli;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::Arc;

/// A vector of network parameters evolved as a unit.
///
/// The weights' length is fixed by the topology at
/// creation and never changes afterwards. `==` compares
/// every field, including fitness and heritage; duplicate
/// detection uses [`Genome::values_equal`] instead.
///
/// Suports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    weights: Vec<f32>,
    topology: Arc<Topology>,
    heritage: Heritage,
    fitness: f32,
}

/// Result of [`Genome::compare_weights`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WeightComparison {
    /// Fraction of index positions whose values differ.
    pub fraction_differing: f32,
    /// Sum of absolute differences, relative to the sum
    /// of absolute weights of the first genome.
    pub normalized_absolute_difference: f64,
}

impl Genome {
    /// Creates a genome with every weight drawn uniformly
    /// from ±[`weight_bound`].
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{GeneticConfig, Genome, Heritage, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![3, 2]).unwrap());
    /// let config = GeneticConfig {
    ///     weight_bound: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let genome = Genome::new(&topology, &config, &mut StdRng::seed_from_u64(0));
    ///
    /// assert_eq!(genome.weights().len(), topology.parameter_count());
    /// assert!(genome.weights().iter().all(|w| w.abs() <= 1.0));
    /// assert_eq!(genome.heritage(), Heritage::New);
    /// assert_eq!(genome.fitness(), 0.0);
    /// ```
    pub fn new<R: Rng + ?Sized>(
        topology: &Arc<Topology>,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Genome {
        let bound = config.weight_bound.abs();
        Genome {
            weights: (0..topology.parameter_count())
                .map(|_| rng.gen_range(-bound..=bound))
                .collect(),
            topology: Arc::clone(topology),
            heritage: Heritage::New,
            fitness: 0.0,
        }
    }

    /// Builds a genome from existing weights, e.g. when
    /// restoring a saved run.
    ///
    /// # Errors
    /// Returns an error if the number of weights does not
    /// match the topology's parameter count.
    pub fn from_weights(
        topology: &Arc<Topology>,
        weights: Vec<f32>,
        heritage: Heritage,
    ) -> Result<Genome, GenomeError> {
        if weights.len() != topology.parameter_count() {
            return Err(GenomeError::IncompatibleTopology {
                expected: topology.parameter_count(),
                found: weights.len(),
            });
        }
        Ok(Genome {
            weights,
            topology: Arc::clone(topology),
            heritage,
            fitness: 0.0,
        })
    }

    /// Returns a copy of the genome to carry over
    /// into the next generation as an elite.
    ///
    /// The copy is tagged [`UnchangedEliteCarryover`] and
    /// starts with zero fitness, as it will be evaluated anew.
    ///
    /// [`UnchangedEliteCarryover`]: Heritage::UnchangedEliteCarryover
    pub fn carry_over(&self) -> Genome {
        Genome {
            weights: self.weights.clone(),
            topology: Arc::clone(&self.topology),
            heritage: Heritage::UnchangedEliteCarryover,
            fitness: 0.0,
        }
    }

    /// Combines two genomes into two children which,
    /// between them, hold every gene of both parents.
    ///
    /// # Errors
    /// Returns an error if the parents' topologies differ.
    /// No children are produced in that case.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{GeneticConfig, Genome, Heritage, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![2, 2]).unwrap());
    /// let mother = Genome::from_weights(&topology, vec![1.0; 6], Heritage::New).unwrap();
    /// let father = Genome::from_weights(&topology, vec![2.0; 6], Heritage::New).unwrap();
    ///
    /// let [first, second] = mother
    ///     .crossover(&father, &GeneticConfig::zero(), &mut StdRng::seed_from_u64(1))
    ///     .unwrap();
    ///
    /// // Each index went to exactly one of the children.
    /// for i in 0..6 {
    ///     assert_eq!(first.weights()[i] + second.weights()[i], 3.0);
    /// }
    /// assert_eq!(first.heritage(), Heritage::Offspring);
    /// ```
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Genome,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<[Genome; 2], GenomeError> {
        self.check_compatibility(other)?;

        let mut first = self.weights.clone();
        let mut second = other.weights.clone();
        match config.crossover {
            CrossoverMethod::SinglePoint => {
                let point = if first.len() > 1 {
                    rng.gen_range(1..first.len())
                } else {
                    0
                };
                first[point..].swap_with_slice(&mut second[point..]);
            }
            CrossoverMethod::Uniform => {
                for (a, b) in first.iter_mut().zip(second.iter_mut()) {
                    if rng.gen::<bool>() {
                        std::mem::swap(a, b);
                    }
                }
            }
        }

        Ok([self.child(first), self.child(second)])
    }

    fn child(&self, weights: Vec<f32>) -> Genome {
        Genome {
            weights,
            topology: Arc::clone(&self.topology),
            heritage: Heritage::Offspring,
            fitness: 0.0,
        }
    }

    /// Perturbs a random subset of the weights with
    /// Gaussian noise of standard deviation `severity`.
    ///
    /// Each weight is picked with probability
    /// [`gene_mutation_chance`]; if none is picked,
    /// a single random weight is. The heritage becomes
    /// the mutated variant of what it was.
    ///
    /// [`gene_mutation_chance`]: GeneticConfig::gene_mutation_chance
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{GeneticConfig, Genome, Heritage, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![4, 1]).unwrap());
    /// let mut genome = Genome::from_weights(&topology, vec![0.0; 5], Heritage::Offspring).unwrap();
    ///
    /// genome.mutate(0.5, &GeneticConfig::zero(), &mut StdRng::seed_from_u64(3));
    ///
    /// assert_eq!(genome.weights().len(), 5);
    /// assert_eq!(genome.heritage(), Heritage::MutatedOffspring);
    /// ```
    pub fn mutate<R: Rng + ?Sized>(&mut self, severity: f32, config: &GeneticConfig, rng: &mut R) {
        let mut perturbed = false;
        for weight in self.weights.iter_mut() {
            if rng.chance(config.gene_mutation_chance) {
                *weight += rng.sample::<f32, _>(StandardNormal) * severity;
                perturbed = true;
            }
        }
        if !perturbed && !self.weights.is_empty() {
            let i = rng.gen_range(0..self.weights.len());
            self.weights[i] += rng.sample::<f32, _>(StandardNormal) * severity;
        }
        self.heritage = self.heritage.mutated();
    }

    /// Returns whether both genomes hold exactly the
    /// same weights, element by element.
    ///
    /// This is exact float comparison: any mutation,
    /// however small, makes genomes unequal.
    pub fn values_equal(&self, other: &Genome) -> bool {
        self.weights == other.weights
    }

    /// Returns whether both genomes were built on
    /// structurally equal topologies.
    pub fn topologies_compatible(&self, other: &Genome) -> bool {
        Arc::ptr_eq(&self.topology, &other.topology) || self.topology == other.topology
    }

    /// Measures how far `other`'s weights are from `self`'s.
    ///
    /// If `self`'s weights are all zero, the normalized
    /// difference is `0.0` for identical genomes and
    /// infinite otherwise.
    ///
    /// # Errors
    /// Returns an error if the topologies or the weight
    /// vector lengths differ.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{Genome, Heritage, Topology};
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![1, 2]).unwrap());
    /// let a = Genome::from_weights(&topology, vec![1.0, 2.0, 1.0, 4.0], Heritage::New).unwrap();
    /// let b = Genome::from_weights(&topology, vec![1.0, 2.0, 2.0, 3.0], Heritage::New).unwrap();
    ///
    /// let comparison = a.compare_weights(&b).unwrap();
    /// assert_eq!(comparison.fraction_differing, 0.5);
    /// assert_eq!(comparison.normalized_absolute_difference, 2.0 / 8.0);
    /// ```
    pub fn compare_weights(&self, other: &Genome) -> Result<WeightComparison, GenomeError> {
        self.check_compatibility(other)?;

        let mut differing = 0;
        let mut accumulated_difference = 0.0f64;
        for (a, b) in self.weights.iter().zip(&other.weights) {
            let difference = (*a as f64 - *b as f64).abs();
            if difference > 0.0 {
                differing += 1;
            }
            accumulated_difference += difference;
        }
        let total_weight: f64 = self.weights.iter().map(|w| (*w as f64).abs()).sum();

        let fraction_differing = if self.weights.is_empty() {
            0.0
        } else {
            differing as f32 / self.weights.len() as f32
        };
        let normalized_absolute_difference = if accumulated_difference == 0.0 {
            0.0
        } else {
            accumulated_difference / total_weight
        };

        Ok(WeightComparison {
            fraction_differing,
            normalized_absolute_difference,
        })
    }

    fn check_compatibility(&self, other: &Genome) -> Result<(), GenomeError> {
        if !self.topologies_compatible(other) || self.weights.len() != other.weights.len() {
            return Err(GenomeError::IncompatibleTopology {
                expected: self.weights.len(),
                found: other.weights.len(),
            });
        }
        Ok(())
    }

    /// Returns the genome's weights and biases.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Returns the topology the weights are laid out by.
    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// Returns how the genome was produced.
    pub fn heritage(&self) -> Heritage {
        self.heritage
    }

    /// Sets the genome's fitness value.
    ///
    /// Should be finite and ≥0; selection
    /// is undefined otherwise.
    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Returns the genome's fitness value.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome{} {} ({}) fitness {:.3} [",
            self.topology, self.heritage, self.weights.len(), self.fitness
        )?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.3}", w)?;
        }
        write!(f, "]")
    }
}
