use super::config::EvolutionConfig;
use super::errors::EvolutionError;
use super::selection::Selector;
use super::simulation::Pacer;
use crate::genomics::{GeneticConfig, Genome, Topology};
use crate::rng::Bernoulli;

use log::debug;
use rand::Rng;

use std::cmp::Ordering;
use std::sync::Arc;

/// Relative tolerance for float noise when rounding up
/// proportions, so that e.g. `0.07 * 100` gives 7 rather
/// than 8. A product above an integer by less than this
/// fraction of itself rounds down to that integer, which
/// is the only departure from a plain `ceil`.
const PROPORTION_TOLERANCE: f32 = 4.0 * f32::EPSILON;

/// How the slots of the next generation are divided.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BreedingPlan {
    /// Best genomes copied as-is.
    pub elites: usize,
    /// Freshly randomized genomes.
    pub fresh: usize,
    /// Crossover children; always even.
    pub offspring: usize,
}

impl BreedingPlan {
    /// Splits a generation of `size` according to `config`.
    ///
    /// # Examples
    /// ```
    /// use genepool::{BreedingPlan, EvolutionConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = EvolutionConfig {
    ///     generation_size: NonZeroUsize::new(9).unwrap(),
    ///     proportion_unchanged: 0.1,
    ///     new_dna_rate: 0.1,
    ///     ..EvolutionConfig::zero()
    /// };
    ///
    /// // ceil(0.9) elites, ceil(0.9) fresh, leaving 7; one more fresh restores parity.
    /// assert_eq!(
    ///     BreedingPlan::for_config(&config),
    ///     BreedingPlan { elites: 1, fresh: 2, offspring: 6 }
    /// );
    /// ```
    pub fn for_config(config: &EvolutionConfig) -> BreedingPlan {
        let size = config.generation_size.get();
        let elites = proportion_of(size, config.proportion_unchanged).min(size);
        let mut fresh = proportion_of(size, config.new_dna_rate).min(size - elites);
        if (size - elites - fresh) % 2 == 1 {
            fresh += 1;
        }
        BreedingPlan {
            elites,
            fresh,
            offspring: size - elites - fresh,
        }
    }
}

fn proportion_of(size: usize, proportion: f32) -> usize {
    let product = size as f32 * proportion;
    (product - product.abs() * PROPORTION_TOLERANCE)
        .ceil()
        .max(0.0) as usize
}

/// Auxiliary type for offspring generation.
/// Builds the next generation's genomes from
/// the outgoing generation, which it only reads.
pub(super) struct OffspringFactory<'a> {
    outgoing: &'a [Genome],
    topology: &'a Arc<Topology>,
    config: &'a EvolutionConfig,
    genetic_config: &'a GeneticConfig,
}

impl<'a> OffspringFactory<'a> {
    pub(super) fn new(
        outgoing: &'a [Genome],
        topology: &'a Arc<Topology>,
        config: &'a EvolutionConfig,
        genetic_config: &'a GeneticConfig,
    ) -> OffspringFactory<'a> {
        OffspringFactory {
            outgoing,
            topology,
            config,
            genetic_config,
        }
    }

    /// Generates the next generation: elites first,
    /// then fresh genomes, then offspring pairs.
    ///
    /// The pacer is invoked after every pair and once
    /// more after the last; it never touches `rng`.
    pub(super) fn generate_offspring<R: Rng + ?Sized>(
        &self,
        plan: BreedingPlan,
        rng: &mut R,
        pacer: &mut dyn Pacer,
    ) -> Result<Vec<Genome>, EvolutionError> {
        let mut next = Vec::with_capacity(plan.elites + plan.fresh + plan.offspring);

        self.add_elite(&mut next, plan.elites);
        next.extend((0..plan.fresh).map(|_| Genome::new(self.topology, self.genetic_config, rng)));
        self.add_mated_offspring(&mut next, plan.offspring, rng, pacer)?;

        Ok(next)
    }

    /// Copies the fittest genomes. Ties keep
    /// their population order.
    fn add_elite(&self, next: &mut Vec<Genome>, elites: usize) {
        let mut ranked: Vec<&Genome> = self.outgoing.iter().collect();
        ranked.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or(Ordering::Equal)
        });
        next.extend(ranked.into_iter().take(elites).map(Genome::carry_over));
    }

    /// Selects distinct parent pairs and mates
    /// them, mutating each child by chance.
    fn add_mated_offspring<R: Rng + ?Sized>(
        &self,
        next: &mut Vec<Genome>,
        offspring: usize,
        rng: &mut R,
        pacer: &mut dyn Pacer,
    ) -> Result<(), EvolutionError> {
        if offspring == 0 {
            return Ok(());
        }
        let selector = Selector::new(self.config.degenerate_selection);
        let pairs = offspring / 2;

        for pair in 0..pairs {
            let (first, second) = selector.select_distinct_pair(self.outgoing, rng)?;
            let children =
                self.outgoing[first].crossover(&self.outgoing[second], self.genetic_config, rng)?;
            for mut child in children {
                if rng.chance(self.config.mutation_rate) {
                    child.mutate(self.config.mutation_severity, self.genetic_config, rng);
                }
                next.push(child);
            }
            debug!("bred pair {}/{} from slots {} and {}", pair + 1, pairs, first, second);
            pacer.pause(self.config.pacing.pair_interval());
        }
        pacer.pause(self.config.pacing.settle_interval());

        Ok(())
    }
}
