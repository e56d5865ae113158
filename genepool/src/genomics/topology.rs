use serde::{Deserialize, Serialize};

use std::fmt;

/// Structural signature of the networks evolved
/// in a run: the size of each layer, from input
/// to output.
///
/// Genomes never interpret their weights, but all
/// genomes of a run must agree on the topology for
/// their weights to line up index by index.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Topology {
    layer_sizes: Vec<usize>,
}

impl Topology {
    /// Creates a fully-connected feed-forward topology.
    ///
    /// Returns `None` if fewer than two layers are given,
    /// or any layer is empty.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::Topology;
    ///
    /// let topology = Topology::new(vec![2, 3, 1]).unwrap();
    /// // (2 inputs + bias) * 3 hidden + (3 hidden + bias) * 1 output.
    /// assert_eq!(topology.parameter_count(), 3 * 3 + 4 * 1);
    ///
    /// assert!(Topology::new(vec![4]).is_none());
    /// assert!(Topology::new(vec![4, 0, 1]).is_none());
    /// ```
    pub fn new(layer_sizes: Vec<usize>) -> Option<Topology> {
        if layer_sizes.len() < 2 || layer_sizes.contains(&0) {
            return None;
        }
        Some(Topology { layer_sizes })
    }

    /// Returns the size of each layer.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Number of inputs of the network.
    pub fn input_count(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Number of outputs of the network.
    pub fn output_count(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Total number of weights and biases, i.e. the
    /// length of every genome built on this topology.
    pub fn parameter_count(&self) -> usize {
        self.layer_sizes
            .windows(2)
            .map(|pair| (pair[0] + 1) * pair[1])
            .sum()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layers: Vec<String> = self.layer_sizes.iter().map(usize::to_string).collect();
        write!(f, "[{}]", layers.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_count_includes_biases() {
        for inputs in 1..6 {
            for outputs in 1..6 {
                let topology = Topology::new(vec![inputs, outputs]).unwrap();
                assert_eq!(topology.parameter_count(), (inputs + 1) * outputs);
                assert_eq!(topology.input_count(), inputs);
                assert_eq!(topology.output_count(), outputs);
            }
        }
    }

    #[test]
    fn structural_equality() {
        assert_eq!(Topology::new(vec![2, 2, 1]), Topology::new(vec![2, 2, 1]));
        assert_ne!(Topology::new(vec![2, 2, 1]), Topology::new(vec![2, 3, 1]));
    }

    #[test]
    fn display() {
        assert_eq!(Topology::new(vec![3, 5, 2]).unwrap().to_string(), "[3-5-2]");
    }
}
