use crate::genomics::{GeneticConfig, Genome};

use log::info;
use rand::Rng;

/// Outcome of a remediation pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RemediationReport {
    /// Genomes with at least one exact duplicate
    /// elsewhere in the generation.
    pub duplicates: usize,
    /// Genomes mutated as a result.
    pub mutated: usize,
}

/// Detects genomes whose weights exactly match another
/// genome's in the same generation, and optionally
/// mutates them apart.
#[derive(Clone, Copy, Debug)]
pub struct Remediator {
    mutate_clones: bool,
    severity: f32,
}

impl Remediator {
    pub fn new(mutate_clones: bool, severity: f32) -> Remediator {
        Remediator {
            mutate_clones,
            severity,
        }
    }

    /// Returns the slots of every genome that is value-equal
    /// to a genome in some other slot, in ascending order.
    ///
    /// # Examples
    /// ```
    /// use genepool::Remediator;
    /// use genepool::genomics::{Genome, Heritage, Topology};
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![1, 1]).unwrap());
    /// let genomes: Vec<Genome> = [[1.0, 2.0], [3.0, 4.0], [1.0, 2.0]]
    ///     .iter()
    ///     .map(|w| Genome::from_weights(&topology, w.to_vec(), Heritage::New).unwrap())
    ///     .collect();
    ///
    /// assert_eq!(Remediator::find_duplicates(&genomes), vec![0, 2]);
    /// ```
    pub fn find_duplicates(genomes: &[Genome]) -> Vec<usize> {
        (0..genomes.len())
            .filter(|&i| {
                genomes
                    .iter()
                    .enumerate()
                    .any(|(j, other)| i != j && genomes[i].values_equal(other))
            })
            .collect()
    }

    /// Finds duplicates and, if enabled, mutates each one
    /// once. Duplicates are found before any mutation and
    /// the pass is not repeated, so some may remain.
    pub fn remediate<R: Rng + ?Sized>(
        &self,
        genomes: &mut [Genome],
        genetic_config: &GeneticConfig,
        rng: &mut R,
    ) -> RemediationReport {
        let duplicates = Self::find_duplicates(genomes);
        if duplicates.is_empty() {
            return RemediationReport::default();
        }
        info!("{} identical genomes found", duplicates.len());

        let mut mutated = 0;
        if self.mutate_clones {
            for &slot in &duplicates {
                genomes[slot].mutate(self.severity, genetic_config, rng);
                mutated += 1;
            }
        }

        RemediationReport {
            duplicates: duplicates.len(),
            mutated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{Heritage, Topology};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn genomes(weights: &[[f32; 2]]) -> Vec<Genome> {
        let topology = Arc::new(Topology::new(vec![1, 1]).unwrap());
        weights
            .iter()
            .map(|w| Genome::from_weights(&topology, w.to_vec(), Heritage::Offspring).unwrap())
            .collect()
    }

    fn genetic_config() -> GeneticConfig {
        GeneticConfig {
            gene_mutation_chance: 0.5,
            ..GeneticConfig::zero()
        }
    }

    #[test]
    fn no_duplicates() {
        let mut genomes = genomes(&[[0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        let untouched = genomes.clone();
        let report = Remediator::new(true, 0.5).remediate(
            &mut genomes,
            &genetic_config(),
            &mut StdRng::seed_from_u64(0),
        );
        assert_eq!(report, RemediationReport::default());
        assert_eq!(genomes, untouched);
    }

    #[test]
    fn duplicates_are_mutated() {
        let mut genomes = genomes(&[[0.5, 1.0], [2.0, 0.0], [0.5, 1.0]]);
        let before = genomes.clone();
        let report = Remediator::new(true, 0.5).remediate(
            &mut genomes,
            &genetic_config(),
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(
            report,
            RemediationReport {
                duplicates: 2,
                mutated: 2
            }
        );
        for slot in [0, 2] {
            assert!(!genomes[slot].values_equal(&before[slot]));
            assert_eq!(genomes[slot].heritage(), Heritage::MutatedOffspring);
        }
        assert_eq!(genomes[1], before[1]);
    }

    #[test]
    fn detection_only() {
        let mut genomes = genomes(&[[0.5, 1.0], [0.5, 1.0], [0.5, 1.0], [3.0, 3.0]]);
        let before = genomes.clone();
        let report = Remediator::new(false, 0.5).remediate(
            &mut genomes,
            &genetic_config(),
            &mut StdRng::seed_from_u64(0),
        );
        assert_eq!(
            report,
            RemediationReport {
                duplicates: 3,
                mutated: 0
            }
        );
        assert_eq!(genomes, before);
    }

    #[test]
    fn negative_zero_is_a_duplicate() {
        let genomes = genomes(&[[0.0, 1.0], [-0.0, 1.0]]);
        assert_eq!(Remediator::find_duplicates(&genomes), vec![0, 1]);
    }
}
