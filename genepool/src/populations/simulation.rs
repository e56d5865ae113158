//! The boundary between evolution and whatever
//! evaluates genomes: the simulation is told which
//! genome each individual runs, and reports back a
//! fitness once the individual's episode is over.

use crate::genomics::Genome;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::mpsc::{SendError, Sender};
use std::time::Duration;

/// Identifies one embodied individual during one generation.
///
/// References are handed out when genomes are bound,
/// and reports carrying a reference from an earlier
/// generation are discarded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct IndividualRef {
    generation: usize,
    slot: usize,
}

impl IndividualRef {
    pub(crate) fn new(generation: usize, slot: usize) -> IndividualRef {
        IndividualRef { generation, slot }
    }

    /// The generation the individual was bound in.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The individual's position in the population.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl fmt::Display for IndividualRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "individual {} of generation {}", self.slot, self.generation)
    }
}

/// An individual's episode has ended with the given fitness.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct IndividualFinished {
    pub individual: IndividualRef,
    pub fitness: f32,
}

/// The external system that embodies and evaluates genomes.
///
/// Each time a generation is released, every individual
/// is rebound to its new genome and then reset.
pub trait Simulation {
    /// Initial placement individuals are reset to.
    type Pose;

    /// Makes `individual` run `genome` from now on.
    fn rebind_genome(&mut self, individual: IndividualRef, genome: &Genome);

    /// Puts `individual` back at `pose`, ready to start
    /// a new episode.
    fn reset_to_initial_state(&mut self, individual: IndividualRef, pose: &Self::Pose);
}

/// Cloneable, thread-safe handle through which a
/// simulation reports finished individuals.
///
/// Reports are queued until the controller
/// [processes](crate::EvolutionController::process_reports) them.
#[derive(Clone, Debug)]
pub struct FitnessReporter {
    sender: Sender<IndividualFinished>,
}

impl FitnessReporter {
    pub(crate) fn new(sender: Sender<IndividualFinished>) -> FitnessReporter {
        FitnessReporter { sender }
    }

    /// Queues a report.
    ///
    /// # Errors
    /// Returns the report if the controller has been dropped.
    pub fn report(
        &self,
        individual: IndividualRef,
        fitness: f32,
    ) -> Result<(), SendError<IndividualFinished>> {
        self.sender.send(IndividualFinished {
            individual,
            fitness,
        })
    }
}

/// Suspension point used while breeding, so that
/// an observer can follow selection pair by pair.
pub trait Pacer {
    fn pause(&mut self, interval: Duration);
}

/// Blocks the current thread for each pause.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&mut self, interval: Duration) {
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }
}

/// Ignores every pause.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self, _interval: Duration) {}
}
