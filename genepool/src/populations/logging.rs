//! Read-only reports on the health of a run:
//! fitness statistics, weight differences between
//! genomes, stagnation and clone detection between
//! generations, and a generational snapshot log.

use super::Population;
use crate::genomics::{Genome, GenomeError, Heritage, WeightComparison};

use ahash::RandomState;
use log::{debug, warn};

use std::collections::HashMap;
use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
    pub total: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use genepool::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        let (mut max, mut min, mut sum) = (f32::MIN, f32::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        data.sort_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: max,
            minimum: min,
            mean: sum / data.len() as f32,
            median,
            total: sum,
        })
    }
}

/// Number of genomes per heritage tag.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct HeritageCounts(HashMap<Heritage, usize, RandomState>);

impl HeritageCounts {
    /// Tallies the heritage of each genome.
    pub fn of<'a>(genomes: impl IntoIterator<Item = &'a Genome>) -> HeritageCounts {
        let mut counts = HeritageCounts::default();
        for genome in genomes {
            counts.add(genome.heritage());
        }
        counts
    }

    pub fn add(&mut self, heritage: Heritage) {
        *self.0.entry(heritage).or_insert(0) += 1;
    }

    pub fn get(&self, heritage: Heritage) -> usize {
        self.0.get(&heritage).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

impl fmt::Display for HeritageCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Heritage::ALL
            .iter()
            .filter(|h| self.get(**h) > 0)
            .map(|h| format!("{} {}", self.get(*h), h))
            .collect();
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Human-readable weight comparison between two genomes.
#[derive(Clone, PartialEq, Debug)]
pub struct WeightDiffReport {
    pub relation: String,
    pub comparison: WeightComparison,
}

impl WeightDiffReport {
    /// Compares the weights of `first` and `second`,
    /// labelling the result with their `relation`
    /// (e.g. "parent -> child").
    ///
    /// # Errors
    /// Returns an error if the genomes are incompatible.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{Genome, Heritage, Topology};
    /// use genepool::logging::WeightDiffReport;
    /// use std::sync::Arc;
    ///
    /// let topology = Arc::new(Topology::new(vec![1, 1]).unwrap());
    /// let a = Genome::from_weights(&topology, vec![1.0, 1.0], Heritage::New).unwrap();
    /// let b = Genome::from_weights(&topology, vec![1.0, 2.0], Heritage::New).unwrap();
    ///
    /// let report = WeightDiffReport::new(&a, &b, "a -> b").unwrap();
    /// assert_eq!(
    ///     report.to_string(),
    ///     "a -> b | 50.00% of weights are different, 50.00% absolute value difference"
    /// );
    /// ```
    pub fn new(
        first: &Genome,
        second: &Genome,
        relation: impl Into<String>,
    ) -> Result<WeightDiffReport, GenomeError> {
        let report = WeightDiffReport {
            relation: relation.into(),
            comparison: first.compare_weights(second)?,
        };
        debug!("{}", report);
        Ok(report)
    }
}

impl fmt::Display for WeightDiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {:.2}% of weights are different, {:.2}% absolute value difference",
            self.relation,
            self.comparison.fraction_differing * 100.0,
            self.comparison.normalized_absolute_difference * 100.0
        )
    }
}

/// Stagnation and clone detection between a
/// generation and its predecessor.
#[derive(Clone, PartialEq, Debug)]
pub struct GenerationDuplicateReport {
    /// Genomes of the current generation that are not
    /// unchanged elites, and so should be new material.
    pub expected_unique: usize,
    /// Of those, genomes with an exact copy in the
    /// previous generation, by heritage.
    pub stagnant: HeritageCounts,
    /// Groups of slots in the current generation
    /// holding identical weights.
    pub clone_clusters: Vec<Vec<usize>>,
    /// Members of those groups, by heritage.
    pub clones: HeritageCounts,
}

impl GenerationDuplicateReport {
    /// Builds the report. Neither generation is modified.
    pub fn new(previous: &[Genome], current: &[Genome]) -> GenerationDuplicateReport {
        let should_be_unique: Vec<&Genome> = current
            .iter()
            .filter(|g| g.heritage() != Heritage::UnchangedEliteCarryover)
            .collect();
        let stagnant = HeritageCounts::of(
            should_be_unique
                .iter()
                .copied()
                .filter(|g| previous.iter().any(|p| p.values_equal(g))),
        );

        let clone_clusters = Self::clusters(current);
        let clones = HeritageCounts::of(clone_clusters.iter().flatten().map(|&slot| &current[slot]));

        GenerationDuplicateReport {
            expected_unique: should_be_unique.len(),
            stagnant,
            clone_clusters,
            clones,
        }
    }

    fn clusters(genomes: &[Genome]) -> Vec<Vec<usize>> {
        let mut assigned = vec![false; genomes.len()];
        let mut clusters = vec![];
        for i in 0..genomes.len() {
            if assigned[i] {
                continue;
            }
            let mut cluster = vec![i];
            for j in i + 1..genomes.len() {
                if !assigned[j] && genomes[i].values_equal(&genomes[j]) {
                    assigned[j] = true;
                    cluster.push(j);
                }
            }
            if cluster.len() > 1 {
                clusters.push(cluster);
            }
        }
        clusters
    }

    /// Whether no stagnation or clones were found.
    pub fn is_clean(&self) -> bool {
        self.stagnant.total() == 0 && self.clone_clusters.is_empty()
    }

    /// Emits any findings as warnings.
    pub fn log(&self) {
        if self.stagnant.total() > 0 {
            warn!(
                "{} genomes identical to previous generation out of {}: {}",
                self.stagnant.total(),
                self.expected_unique,
                self.stagnant
            );
        }
        if !self.clone_clusters.is_empty() {
            warn!(
                "{} clusters of identical genomes within generation: {}",
                self.clone_clusters.len(),
                self.clones
            );
        }
    }
}

impl fmt::Display for GenerationDuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stagnant {}/{} ({}), clone clusters {} ({})",
            self.stagnant.total(),
            self.expected_unique,
            self.stagnant,
            self.clone_clusters.len(),
            self.clones
        )
    }
}

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    AllGenomes(Vec<Genome>),
    PopulationChampion(Genome),
    None,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub fitness: Option<Stats>,
    pub heritage: HeritageCounts,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {}\n\
            \tfitness: {:?}\n\
            \theritage: {}\n\
            }}",
            self.generation_number, self.fitness, self.heritage
        )
    }
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population. Meant to be
    /// called once its fitness has been evaluated.
    pub fn log(&mut self, population: &Population) {
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => {
                    GenerationMemberRecord::AllGenomes(population.genomes().to_vec())
                }
                ReportingLevel::PopulationChampion => match population.champion() {
                    Some(champion) => GenerationMemberRecord::PopulationChampion(champion.clone()),
                    None => GenerationMemberRecord::None,
                },
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            fitness: population.fitness_stats(),
            heritage: HeritageCounts::of(population.genomes()),
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }
}
