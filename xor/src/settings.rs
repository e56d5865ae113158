use genepool::genomics::{CrossoverMethod, GeneticConfig, Topology};
use genepool::{ConfigError, EvolutionConfig};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;
use std::path::Path;

/// Everything needed to start a run, as read
/// from a TOML run file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    pub topology: Vec<usize>,
    pub evolution: EvolutionConfig,
    pub genetics: GeneticConfig,
}

impl RunFile {
    pub fn load(path: &Path) -> anyhow::Result<RunFile> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run file {}", path.display()))?;
        let run: RunFile = toml::from_str(&contents)
            .with_context(|| format!("failed to parse run file {}", path.display()))?;
        run.validate()?;
        Ok(run)
    }

    /// Checks both configurations and the topology.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evolution.validate()?;
        self.genetics.validate()?;
        self.topology().map(|_| ())
    }

    pub fn topology(&self) -> Result<Topology, ConfigError> {
        Topology::new(self.topology.clone())
            .ok_or_else(|| ConfigError::InvalidTopology(format!("{:?}", self.topology)))
    }
}

impl Default for RunFile {
    fn default() -> RunFile {
        RunFile {
            topology: vec![2, 3, 1],
            evolution: EvolutionConfig {
                generation_size: NonZeroUsize::new(150).unwrap(),
                proportion_unchanged: 0.05,
                new_dna_rate: 0.05,
                mutation_rate: 0.6,
                mutation_severity: 0.6,
                mutate_clones: true,
                clone_mutation_severity: 0.5,
                ..EvolutionConfig::zero()
            },
            genetics: GeneticConfig {
                weight_bound: 3.0,
                gene_mutation_chance: 0.25,
                crossover: CrossoverMethod::Uniform,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_run_file_matches_defaults() {
        let contents = include_str!("../xor.toml");
        let mut run: RunFile = toml::from_str(contents).unwrap();
        assert!(run.evolution.report_diagnostics);
        run.evolution.report_diagnostics = false;
        assert_eq!(run, RunFile::default());
    }

    #[test]
    fn rejects_infinite_weight_bound() {
        let mut run: RunFile = toml::from_str(include_str!("../xor.toml")).unwrap();
        run.genetics.weight_bound = f32::INFINITY;
        assert!(matches!(
            run.validate(),
            Err(ConfigError::NegativeSeverity {
                field: "weight_bound",
                ..
            })
        ));
        assert_eq!(RunFile::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_layers() {
        let run = RunFile {
            topology: vec![2, 0, 1],
            ..RunFile::default()
        };
        assert!(matches!(run.topology(), Err(ConfigError::InvalidTopology(_))));
        assert!(run.validate().is_err());
    }
}
