use genepool::genomics::{Genome, Topology};
use genepool::{FitnessReporter, IndividualRef, Simulation};

use log::warn;
use rayon::prelude::*;

/// Allowed error margin for network answers.
const ERROR_MARGIN: f32 = 0.3;

/// Best possible fitness: no error on any case.
pub const PERFECT_FITNESS: f32 = 16.0;

/// One input/expected-output pair.
pub type Case = ([f32; 2], f32);

/// The full XOR truth table, which every
/// episode starts from.
pub fn xor_cases() -> Vec<Case> {
    vec![
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ]
}

/// A fully-connected feed-forward network read
/// straight from a genome's weights: tanh hidden
/// layers and a sigmoid output layer.
///
/// For each neuron the weights of its inputs come
/// first, then its bias.
#[derive(Clone, Debug, Default)]
pub struct Network {
    layer_sizes: Vec<usize>,
    weights: Vec<f32>,
}

impl Network {
    pub fn new(topology: &Topology, genome: &Genome) -> Network {
        Network {
            layer_sizes: topology.layer_sizes().to_vec(),
            weights: genome.weights().to_vec(),
        }
    }

    pub fn evaluate(&self, input: &[f32]) -> Vec<f32> {
        let mut activations = input.to_vec();
        let mut offset = 0;
        let output_layer = self.layer_sizes.len().saturating_sub(2);
        for (layer, pair) in self.layer_sizes.windows(2).enumerate() {
            let (inputs, outputs) = (pair[0], pair[1]);
            activations = (0..outputs)
                .map(|neuron| {
                    let start = offset + neuron * (inputs + 1);
                    let weights = &self.weights[start..start + inputs + 1];
                    let sum = weights[inputs]
                        + activations
                            .iter()
                            .zip(weights)
                            .map(|(a, w)| a * w)
                            .sum::<f32>();
                    if layer == output_layer {
                        1.0 / (1.0 + (-sum).exp())
                    } else {
                        sum.tanh()
                    }
                })
                .collect();
            offset += (inputs + 1) * outputs;
        }
        activations
    }
}

/// An embodied individual: a network plus the
/// cases still to be answered in its episode.
#[derive(Clone, Debug)]
struct Agent {
    individual: IndividualRef,
    network: Network,
    pending: Vec<Case>,
    error: f32,
}

impl Agent {
    /// Answers every pending case and returns
    /// the episode's fitness.
    fn run_episode(&mut self) -> f32 {
        for (input, expected) in self.pending.drain(..) {
            let error = (self.network.evaluate(&input)[0] - expected).abs();
            if error >= ERROR_MARGIN {
                self.error += error;
            }
        }
        (4.0 - self.error).max(0.0).powf(2.0)
    }
}

/// Hosts one agent per individual of the
/// generation under evaluation.
#[derive(Debug)]
pub struct XorArena {
    topology: Topology,
    agents: Vec<Agent>,
}

impl XorArena {
    pub fn new(topology: &Topology) -> XorArena {
        XorArena {
            topology: topology.clone(),
            agents: vec![],
        }
    }

    /// Runs every agent's episode on the rayon pool,
    /// reporting each fitness as soon as it is known.
    pub fn run_episodes(&mut self, reporter: &FitnessReporter) {
        self.agents
            .par_iter_mut()
            .for_each_with(reporter.clone(), |reporter, agent| {
                let fitness = agent.run_episode();
                if let Err(e) = reporter.report(agent.individual, fitness) {
                    warn!("dropped report: {}", e);
                }
            });
    }
}

impl Simulation for XorArena {
    type Pose = Vec<Case>;

    fn rebind_genome(&mut self, individual: IndividualRef, genome: &Genome) {
        let agent = Agent {
            individual,
            network: Network::new(&self.topology, genome),
            pending: vec![],
            error: 0.0,
        };
        match self.agents.get_mut(individual.slot()) {
            Some(slot) => *slot = agent,
            None => self.agents.push(agent),
        }
    }

    fn reset_to_initial_state(&mut self, individual: IndividualRef, pose: &Vec<Case>) {
        if let Some(agent) = self.agents.get_mut(individual.slot()) {
            agent.pending = pose.clone();
            agent.error = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genepool::genomics::Heritage;
    use std::sync::Arc;

    #[test]
    fn hand_built_xor_network() {
        // Hidden: OR-like and AND-like units; output: OR and not AND.
        let topology = Arc::new(Topology::new(vec![2, 2, 1]).unwrap());
        let weights = vec![20.0, 20.0, -10.0, 20.0, 20.0, -30.0, 20.0, -20.0, -10.0];
        let genome = Genome::from_weights(&topology, weights, Heritage::New).unwrap();
        let network = Network::new(&topology, &genome);

        for (input, expected) in xor_cases() {
            let output = network.evaluate(&input)[0];
            assert!((output - expected).abs() < ERROR_MARGIN, "{:?} -> {}", input, output);
        }

        let mut agent = Agent {
            individual: individual(0),
            network,
            pending: xor_cases(),
            error: 0.0,
        };
        assert_eq!(agent.run_episode(), PERFECT_FITNESS);
    }

    fn individual(slot: usize) -> IndividualRef {
        ron::from_str(&format!("(generation: 1, slot: {})", slot)).unwrap()
    }

    #[test]
    fn arena_rebinds_by_slot() {
        let topology = Arc::new(Topology::new(vec![2, 1]).unwrap());
        let mut arena = XorArena::new(&topology);
        let genome = Genome::from_weights(&topology, vec![0.0; 3], Heritage::New).unwrap();
        let individual = individual(0);

        arena.rebind_genome(individual, &genome);
        arena.rebind_genome(individual, &genome);
        arena.reset_to_initial_state(individual, &xor_cases());
        assert_eq!(arena.agents.len(), 1);
        assert_eq!(arena.agents[0].pending.len(), 4);
    }
}
