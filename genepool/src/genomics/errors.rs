use thiserror::Error;

/// Errors raised by operations between two genomes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenomeError {
    /// The genomes were built on different topologies,
    /// or their weight vectors differ in length.
    #[error("incompatible genome topologies: {expected} parameters vs {found}")]
    IncompatibleTopology { expected: usize, found: usize },
}
