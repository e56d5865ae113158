use super::config::DegenerateSelection;
use super::errors::EvolutionError;
use crate::genomics::Genome;

use rand::seq::SliceRandom;
use rand::Rng;

/// Fitness-proportional (roulette-wheel) selection.
///
/// Genomes are identified by their slot in the pool,
/// so two value-equal genomes in different slots are
/// still distinct candidates.
#[derive(Clone, Copy, Debug)]
pub struct Selector {
    on_degenerate: DegenerateSelection,
}

impl Selector {
    pub fn new(on_degenerate: DegenerateSelection) -> Selector {
        Selector { on_degenerate }
    }

    /// Picks a slot of `pool` with probability
    /// proportional to its genome's fitness.
    ///
    /// # Errors
    /// Returns an error if the pool is empty, or its
    /// total fitness is zero and the selector is
    /// configured to fail in that case.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{Genome, Heritage, Topology};
    /// use genepool::{DegenerateSelection, Selector};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![1, 1]).unwrap());
    /// let mut pool: Vec<Genome> = (0..3)
    ///     .map(|i| Genome::from_weights(&topology, vec![i as f32; 2], Heritage::New).unwrap())
    ///     .collect();
    /// pool[2].set_fitness(1.0);
    ///
    /// // Only the third genome has any fitness.
    /// let selector = Selector::new(DegenerateSelection::Uniform);
    /// assert_eq!(selector.select_one(&pool, &mut StdRng::seed_from_u64(0)).unwrap(), 2);
    /// ```
    pub fn select_one<R: Rng + ?Sized>(
        &self,
        pool: &[Genome],
        rng: &mut R,
    ) -> Result<usize, EvolutionError> {
        if pool.is_empty() {
            return Err(EvolutionError::InsufficientPopulation {
                required: 1,
                available: 0,
            });
        }
        let mut candidates: Vec<usize> = (0..pool.len()).collect();
        self.spin(pool, &mut candidates, rng)
    }

    /// Picks two different slots of `pool`, each
    /// proportionally to fitness. The second pick
    /// excludes the first slot, not genomes equal to it.
    ///
    /// # Errors
    /// Returns an error if the pool has fewer than two
    /// genomes, or on degenerate fitness as in [`select_one`].
    ///
    /// [`select_one`]: Selector::select_one
    pub fn select_distinct_pair<R: Rng + ?Sized>(
        &self,
        pool: &[Genome],
        rng: &mut R,
    ) -> Result<(usize, usize), EvolutionError> {
        if pool.len() < 2 {
            return Err(EvolutionError::InsufficientPopulation {
                required: 2,
                available: pool.len(),
            });
        }
        let mut candidates: Vec<usize> = (0..pool.len()).collect();
        let first = self.spin(pool, &mut candidates, rng)?;
        candidates.retain(|&slot| slot != first);
        let second = self.spin(pool, &mut candidates, rng)?;
        Ok((first, second))
    }

    /// Runs one roulette spin over `candidates`, which
    /// is visited in a random order so that ties carry
    /// no positional bias.
    fn spin<R: Rng + ?Sized>(
        &self,
        pool: &[Genome],
        candidates: &mut [usize],
        rng: &mut R,
    ) -> Result<usize, EvolutionError> {
        candidates.shuffle(rng);
        let total: f32 = candidates.iter().map(|&slot| pool[slot].fitness()).sum();

        if !(total > 0.0 && total.is_finite()) {
            return match self.on_degenerate {
                // Already shuffled, so the first candidate is a uniform pick.
                DegenerateSelection::Uniform => Ok(candidates[0]),
                DegenerateSelection::Fail => Err(EvolutionError::DegenerateSelection {
                    total_fitness: total,
                }),
            };
        }

        let mut remaining = rng.gen_range(0.0..total);
        for &slot in candidates.iter() {
            remaining -= pool[slot].fitness();
            if remaining < 0.0 {
                return Ok(slot);
            }
        }
        // Rounding can leave a sliver above zero.
        Ok(candidates[candidates.len() - 1])
    }
}
