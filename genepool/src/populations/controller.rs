use super::config::EvolutionConfig;
use super::errors::EvolutionError;
use super::logging::{EvolutionLogger, GenerationDuplicateReport, ReportingLevel, Stats};
use super::offspring_factory::{BreedingPlan, OffspringFactory};
use super::remediation::{RemediationReport, Remediator};
use super::simulation::{
    FitnessReporter, IndividualFinished, IndividualRef, Pacer, Simulation, ThreadSleep,
};
use super::Population;
use crate::genomics::{GeneticConfig, Genome, HeritagePalette, Topology};
use crate::rng;

use log::{debug, info, warn};
use rand::rngs::StdRng;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Lifecycle stages of an [`EvolutionController`].
///
/// Between calls the controller is only ever observed
/// `Uninitialized`, `Evaluating` or `Halted`; the other
/// stages are passed through while a generation advances.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControllerState {
    Uninitialized,
    Seeding,
    Evaluating,
    Breeding,
    Remediating,
    Released,
    /// Terminal. Entered when breeding fails.
    Halted,
}

/// Summary of one completed generation, returned
/// when its last individual reports.
#[derive(Clone, PartialEq, Debug)]
pub struct GenerationRecord {
    /// Number of the generation that was evaluated.
    pub generation: usize,
    /// Fitness statistics of that generation.
    pub fitness: Option<Stats>,
    /// How its successor was composed.
    pub plan: BreedingPlan,
    pub remediation: RemediationReport,
    /// Present if diagnostics are enabled.
    pub diagnostics: Option<GenerationDuplicateReport>,
}

/// Drives a population through repeated cycles of
/// evaluation by a [`Simulation`], breeding and release.
///
/// Fitness reports enter through
/// [`individual_finished`](EvolutionController::individual_finished),
/// either directly or queued from other threads through a
/// [`FitnessReporter`] and drained by
/// [`process_reports`](EvolutionController::process_reports).
/// When the last individual of a generation reports, the
/// next generation is bred and released on the spot.
pub struct EvolutionController<S: Simulation> {
    config: EvolutionConfig,
    genetic_config: GeneticConfig,
    topology: Arc<Topology>,
    palette: HeritagePalette,
    simulation: S,
    initial_pose: S::Pose,
    pacer: Box<dyn Pacer + Send>,
    logger: Option<EvolutionLogger>,
    rng: StdRng,
    state: ControllerState,
    population: Option<Population>,
    finished: Vec<bool>,
    remaining: usize,
    sender: Sender<IndividualFinished>,
    receiver: Receiver<IndividualFinished>,
}

impl<S: Simulation> EvolutionController<S> {
    /// Creates an uninitialized controller. Call
    /// [`seed`](EvolutionController::seed) or
    /// [`load_generation`](EvolutionController::load_generation)
    /// to release a first generation.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    pub fn new(
        config: EvolutionConfig,
        genetic_config: GeneticConfig,
        topology: Topology,
        simulation: S,
        initial_pose: S::Pose,
    ) -> Result<EvolutionController<S>, EvolutionError> {
        config.validate()?;
        genetic_config.validate()?;
        let (sender, receiver) = mpsc::channel();
        Ok(EvolutionController {
            rng: rng::seeded(config.seed),
            config,
            genetic_config,
            topology: Arc::new(topology),
            palette: HeritagePalette::default(),
            simulation,
            initial_pose,
            pacer: Box::new(ThreadSleep),
            logger: None,
            state: ControllerState::Uninitialized,
            population: None,
            finished: vec![],
            remaining: 0,
            sender,
            receiver,
        })
    }

    /// Replaces the breeding pacer, which by default
    /// sleeps the current thread.
    pub fn with_pacer(mut self, pacer: impl Pacer + Send + 'static) -> EvolutionController<S> {
        self.pacer = Box::new(pacer);
        self
    }

    pub fn with_palette(mut self, palette: HeritagePalette) -> EvolutionController<S> {
        self.palette = palette;
        self
    }

    /// Keeps a snapshot of every evaluated generation.
    pub fn with_logger(mut self, reporting_level: ReportingLevel) -> EvolutionController<S> {
        self.logger = Some(EvolutionLogger::new(reporting_level));
        self
    }

    /// Creates and releases the first generation of
    /// freshly randomized genomes.
    ///
    /// # Errors
    /// Returns an error unless the controller is uninitialized.
    pub fn seed(&mut self) -> Result<(), EvolutionError> {
        if self.state != ControllerState::Uninitialized {
            return Err(EvolutionError::InvalidState {
                operation: "seed",
                state: self.state,
            });
        }
        self.transition(ControllerState::Seeding);
        let genomes = (0..self.config.generation_size.get())
            .map(|_| Genome::new(&self.topology, &self.genetic_config, &mut self.rng))
            .collect();
        let population = Population {
            generation: 1,
            topology: Arc::clone(&self.topology),
            genomes,
        };
        info!("Generation 1 seeded");
        self.release(population);
        Ok(())
    }

    /// Releases an externally supplied generation in place of
    /// the current one, e.g. to resume a saved run. The run
    /// continues from `generation_number`. Genome heritage is
    /// kept and fitness is reset.
    ///
    /// # Errors
    /// Returns an error if the controller has halted, the
    /// pool's size differs from the configured generation
    /// size, or `topology` or any genome does not match the
    /// run's topology.
    pub fn load_generation(
        &mut self,
        generation_number: usize,
        topology: Topology,
        gene_pool: Vec<Genome>,
    ) -> Result<(), EvolutionError> {
        if self.state == ControllerState::Halted {
            return Err(EvolutionError::Halted);
        }
        if gene_pool.len() != self.config.generation_size.get() {
            return Err(EvolutionError::PopulationSizeMismatch {
                expected: self.config.generation_size.get(),
                found: gene_pool.len(),
            });
        }
        if topology != *self.topology {
            return Err(EvolutionError::IncompatibleTopology {
                expected: self.topology.parameter_count(),
                found: topology.parameter_count(),
            });
        }
        if let Some(misfit) = gene_pool.iter().find(|g| **g.topology() != *self.topology) {
            return Err(EvolutionError::IncompatibleTopology {
                expected: self.topology.parameter_count(),
                found: misfit.weights().len(),
            });
        }
        let genomes = gene_pool
            .into_iter()
            .map(|g| Genome::from_weights(&self.topology, g.weights().to_vec(), g.heritage()))
            .collect::<Result<Vec<_>, _>>()?;

        self.transition(ControllerState::Seeding);
        info!("Generation {} loaded", generation_number);
        self.release(Population {
            generation: generation_number,
            topology: Arc::clone(&self.topology),
            genomes,
        });
        Ok(())
    }

    /// Returns a handle through which fitness reports
    /// can be queued, from any thread.
    pub fn reporter(&self) -> FitnessReporter {
        FitnessReporter::new(self.sender.clone())
    }

    /// Records `individual`'s final fitness. If it was the
    /// last individual of its generation still running, the
    /// next generation is bred and released, and a record
    /// of the finished generation is returned.
    ///
    /// Reports for an earlier generation, repeated reports
    /// and reports before the first release are ignored.
    ///
    /// # Errors
    /// Returns an error if the fitness is negative or not
    /// finite, if the controller has halted, or if breeding
    /// fails, in which case the controller halts.
    pub fn individual_finished(
        &mut self,
        individual: IndividualRef,
        fitness: f32,
    ) -> Result<Option<GenerationRecord>, EvolutionError> {
        match self.state {
            ControllerState::Evaluating => {}
            ControllerState::Halted => return Err(EvolutionError::Halted),
            state => {
                warn!("ignoring report for {} while {:?}", individual, state);
                return Ok(None);
            }
        }
        let population = match self.population.as_mut() {
            Some(population) => population,
            None => {
                return Err(EvolutionError::InvalidState {
                    operation: "record fitness",
                    state: self.state,
                })
            }
        };
        if individual.generation() != population.generation
            || individual.slot() >= population.genomes.len()
        {
            warn!("ignoring stale report for {}", individual);
            return Ok(None);
        }
        if !(fitness >= 0.0 && fitness.is_finite()) {
            return Err(EvolutionError::InvalidFitness {
                individual,
                fitness,
            });
        }
        if self.finished[individual.slot()] {
            warn!("ignoring repeated report for {}", individual);
            return Ok(None);
        }

        population.genomes[individual.slot()].set_fitness(fitness);
        self.finished[individual.slot()] = true;
        self.remaining -= 1;
        if self.remaining > 0 {
            return Ok(None);
        }
        self.advance().map(Some)
    }

    /// Handles every report queued through a
    /// [`FitnessReporter`] so far, returning the records
    /// of any generations completed along the way.
    ///
    /// # Errors
    /// Stops at the first report that fails, as in
    /// [`individual_finished`](EvolutionController::individual_finished).
    /// Later reports stay queued.
    pub fn process_reports(&mut self) -> Result<Vec<GenerationRecord>, EvolutionError> {
        let mut records = vec![];
        while let Ok(report) = self.receiver.try_recv() {
            if let Some(record) = self.individual_finished(report.individual, report.fitness)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Breeds, remediates and releases the successor
    /// of the fully evaluated current generation.
    fn advance(&mut self) -> Result<GenerationRecord, EvolutionError> {
        let outgoing = match self.population.take() {
            Some(population) => population,
            None => {
                return Err(EvolutionError::InvalidState {
                    operation: "advance",
                    state: self.state,
                })
            }
        };
        self.transition(ControllerState::Breeding);

        let fitness = outgoing.fitness_stats();
        if let Some(stats) = &fitness {
            info!(
                "Generation {}: avg {:.4} max {:.4}",
                outgoing.generation, stats.mean, stats.maximum
            );
        }
        if let Some(logger) = &mut self.logger {
            logger.log(&outgoing);
        }

        let plan = BreedingPlan::for_config(&self.config);
        let factory = OffspringFactory::new(
            &outgoing.genomes,
            &self.topology,
            &self.config,
            &self.genetic_config,
        );
        let mut candidate =
            match factory.generate_offspring(plan, &mut self.rng, self.pacer.as_mut()) {
                Ok(candidate) => candidate,
                Err(error) => {
                    self.transition(ControllerState::Halted);
                    return Err(error);
                }
            };

        self.transition(ControllerState::Remediating);
        let remediation = Remediator::new(self.config.mutate_clones, self.config.clone_mutation_severity)
            .remediate(&mut candidate, &self.genetic_config, &mut self.rng);

        let diagnostics = if self.config.report_diagnostics {
            let report = GenerationDuplicateReport::new(&outgoing.genomes, &candidate);
            report.log();
            Some(report)
        } else {
            None
        };

        let record = GenerationRecord {
            generation: outgoing.generation,
            fitness,
            plan,
            remediation,
            diagnostics,
        };
        let next = Population {
            generation: outgoing.generation + 1,
            topology: Arc::clone(&self.topology),
            genomes: candidate,
        };
        drop(outgoing);
        self.release(next);
        Ok(record)
    }

    /// Makes `population` current and has the simulation
    /// rebind and reset every individual.
    fn release(&mut self, population: Population) {
        self.transition(ControllerState::Released);
        for (slot, genome) in population.genomes.iter().enumerate() {
            let individual = IndividualRef::new(population.generation, slot);
            self.simulation.rebind_genome(individual, genome);
            self.simulation
                .reset_to_initial_state(individual, &self.initial_pose);
        }
        self.finished = vec![false; population.genomes.len()];
        self.remaining = population.genomes.len();
        self.population = Some(population);
        self.transition(ControllerState::Evaluating);
    }

    fn transition(&mut self, state: ControllerState) {
        debug!("controller {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The generation under evaluation, if any.
    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Number of the generation under evaluation,
    /// or 0 before the first release.
    pub fn generation(&self) -> usize {
        self.population.as_ref().map_or(0, |p| p.generation)
    }

    /// References to every individual of the current
    /// generation, in slot order.
    pub fn individuals(&self) -> impl Iterator<Item = IndividualRef> + '_ {
        let generation = self.generation();
        let len = self.population.as_ref().map_or(0, Population::len);
        (0..len).map(move |slot| IndividualRef::new(generation, slot))
    }

    /// Individuals of the current generation yet to report.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic_config
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn palette(&self) -> &HeritagePalette {
        &self.palette
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn logger(&self) -> Option<&EvolutionLogger> {
        self.logger.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::Heritage;
    use crate::populations::config::DegenerateSelection;
    use crate::populations::errors::ConfigError;
    use crate::populations::simulation::NoPause;
    use std::num::NonZeroUsize;

    #[derive(Debug, PartialEq)]
    enum Call {
        Rebind(IndividualRef, Vec<f32>),
        Reset(IndividualRef, u8),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Simulation for Recorder {
        type Pose = u8;

        fn rebind_genome(&mut self, individual: IndividualRef, genome: &Genome) {
            self.calls
                .push(Call::Rebind(individual, genome.weights().to_vec()));
        }

        fn reset_to_initial_state(&mut self, individual: IndividualRef, pose: &u8) {
            self.calls.push(Call::Reset(individual, *pose));
        }
    }

    fn topology() -> Topology {
        Topology::new(vec![2, 2, 1]).unwrap()
    }

    fn genetic_config() -> GeneticConfig {
        GeneticConfig {
            weight_bound: 1.0,
            gene_mutation_chance: 0.3,
            ..GeneticConfig::zero()
        }
    }

    fn config(size: usize) -> EvolutionConfig {
        EvolutionConfig {
            generation_size: NonZeroUsize::new(size).unwrap(),
            proportion_unchanged: 0.1,
            new_dna_rate: 0.1,
            mutation_rate: 0.5,
            mutation_severity: 0.2,
            seed: Some(11),
            ..EvolutionConfig::zero()
        }
    }

    fn controller(config: EvolutionConfig) -> EvolutionController<Recorder> {
        EvolutionController::new(config, genetic_config(), topology(), Recorder::default(), 7)
            .unwrap()
            .with_pacer(NoPause)
    }

    /// Reports fitness `slot + 1` for every individual.
    fn evaluate(controller: &mut EvolutionController<Recorder>) -> Option<GenerationRecord> {
        let individuals: Vec<_> = controller.individuals().collect();
        let mut record = None;
        for individual in individuals {
            record = controller
                .individual_finished(individual, individual.slot() as f32 + 1.0)
                .unwrap();
        }
        record
    }

    fn identical_pool(size: usize) -> Vec<Genome> {
        let topology = Arc::new(topology());
        let weights = vec![0.25; topology.parameter_count()];
        (0..size)
            .map(|_| Genome::from_weights(&topology, weights.clone(), Heritage::New).unwrap())
            .collect()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EvolutionConfig {
            mutation_rate: 2.0,
            ..config(4)
        };
        assert!(matches!(
            EvolutionController::new(config, genetic_config(), topology(), Recorder::default(), 0),
            Err(EvolutionError::Config(_))
        ));
    }

    #[test]
    fn seed_binds_and_resets_every_individual() {
        let mut controller = controller(config(3));
        assert_eq!(controller.state(), ControllerState::Uninitialized);
        controller.seed().unwrap();

        assert_eq!(controller.state(), ControllerState::Evaluating);
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.remaining(), 3);

        let population = controller.population().unwrap();
        let expected: Vec<Call> = population
            .genomes()
            .iter()
            .enumerate()
            .flat_map(|(slot, g)| {
                let individual = IndividualRef::new(1, slot);
                [
                    Call::Rebind(individual, g.weights().to_vec()),
                    Call::Reset(individual, 7),
                ]
            })
            .collect();
        assert_eq!(controller.simulation().calls, expected);
    }

    #[test]
    fn seed_twice() {
        let mut controller = controller(config(3));
        controller.seed().unwrap();
        assert_eq!(
            controller.seed(),
            Err(EvolutionError::InvalidState {
                operation: "seed",
                state: ControllerState::Evaluating
            })
        );
    }

    #[test]
    fn report_before_release_is_ignored() {
        let mut controller = controller(config(2));
        assert_eq!(
            controller.individual_finished(IndividualRef::new(1, 0), 1.0),
            Ok(None)
        );
        assert_eq!(controller.state(), ControllerState::Uninitialized);
    }

    #[test]
    fn end_to_end_generation() {
        let mut controller = controller(config(10));
        controller.seed().unwrap();

        let record = evaluate(&mut controller).unwrap();
        assert_eq!(record.generation, 1);
        assert_eq!(record.fitness.unwrap().total, 55.0);
        assert_eq!(
            record.plan,
            BreedingPlan {
                elites: 1,
                fresh: 1,
                offspring: 8
            }
        );

        assert_eq!(controller.generation(), 2);
        assert_eq!(controller.remaining(), 10);
        let population = controller.population().unwrap();
        assert_eq!(population.len(), 10);
        assert!(population
            .genomes()
            .iter()
            .all(|g| g.weights().len() == controller.topology().parameter_count()));

        let counts = population.heritage_counts();
        assert_eq!(
            counts.get(Heritage::UnchangedEliteCarryover) + counts.get(Heritage::MutatedElite),
            1
        );
        assert_eq!(counts.get(Heritage::New), 1);
        assert_eq!(
            counts.get(Heritage::Offspring) + counts.get(Heritage::MutatedOffspring),
            8
        );
        assert!(population.genomes().iter().all(|g| g.fitness() == 0.0));
    }

    #[test]
    fn extra_reports_do_not_breed_twice() {
        let mut controller = controller(config(4));
        controller.seed().unwrap();
        let last = IndividualRef::new(1, 3);
        assert!(evaluate(&mut controller).is_some());

        assert_eq!(controller.individual_finished(last, 1.0), Ok(None));
        assert_eq!(controller.generation(), 2);
        assert_eq!(controller.remaining(), 4);

        let first = IndividualRef::new(2, 0);
        assert_eq!(controller.individual_finished(first, 1.0), Ok(None));
        assert_eq!(controller.individual_finished(first, 1.0), Ok(None));
        assert_eq!(controller.remaining(), 3);
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut controller = controller(config(2));
        controller.seed().unwrap();
        assert_eq!(
            controller.individual_finished(IndividualRef::new(1, 5), 1.0),
            Ok(None)
        );
        assert_eq!(controller.remaining(), 2);
    }

    #[test]
    fn invalid_fitness_is_not_counted() {
        let mut controller = controller(config(2));
        controller.seed().unwrap();
        let individual = IndividualRef::new(1, 0);
        for fitness in [-1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                controller.individual_finished(individual, fitness),
                Err(EvolutionError::InvalidFitness { .. })
            ));
        }
        assert_eq!(controller.remaining(), 2);
        assert_eq!(controller.individual_finished(individual, 0.0), Ok(None));
        assert_eq!(controller.remaining(), 1);
    }

    #[test]
    fn queued_reports() {
        let mut controller = controller(config(4));
        controller.seed().unwrap();
        let reporter = controller.reporter();
        let individuals: Vec<_> = controller.individuals().collect();

        std::thread::spawn(move || {
            for individual in individuals {
                reporter.report(individual, 2.0).unwrap();
            }
        })
        .join()
        .unwrap();

        let records = controller.process_reports().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fitness.unwrap().mean, 2.0);
        assert_eq!(controller.generation(), 2);
        assert!(controller.process_reports().unwrap().is_empty());
    }

    #[test]
    fn load_rejects_mismatched_size() {
        let mut controller = controller(config(4));
        assert_eq!(
            controller.load_generation(3, topology(), identical_pool(3)),
            Err(EvolutionError::PopulationSizeMismatch {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(controller.state(), ControllerState::Uninitialized);
    }

    #[test]
    fn load_rejects_mismatched_topology() {
        let mut controller = controller(config(2));
        let other = Topology::new(vec![2, 1]).unwrap();
        assert_eq!(
            controller.load_generation(3, other, identical_pool(2)),
            Err(EvolutionError::IncompatibleTopology {
                expected: 9,
                found: 3
            })
        );

        let other = Arc::new(Topology::new(vec![2, 1]).unwrap());
        let mut pool = identical_pool(1);
        pool.push(Genome::from_weights(&other, vec![0.0; 3], Heritage::New).unwrap());
        assert!(matches!(
            controller.load_generation(3, topology(), pool),
            Err(EvolutionError::IncompatibleTopology { .. })
        ));
    }

    #[test]
    fn load_rejects_genomes_of_equal_length_but_other_topology() {
        let mut controller = controller(config(2));
        // [2-3] has as many parameters as the run's [2-2-1].
        let other = Arc::new(Topology::new(vec![2, 3]).unwrap());
        assert_eq!(other.parameter_count(), topology().parameter_count());
        let mut pool = identical_pool(1);
        pool.push(Genome::from_weights(&other, vec![0.5; 9], Heritage::New).unwrap());

        assert_eq!(
            controller.load_generation(3, topology(), pool),
            Err(EvolutionError::IncompatibleTopology {
                expected: 9,
                found: 9
            })
        );
        assert_eq!(controller.state(), ControllerState::Uninitialized);
        assert!(controller.simulation().calls.is_empty());
    }

    #[test]
    fn rejects_invalid_genetic_config() {
        for weight_bound in [f32::INFINITY, f32::NAN, -1.0] {
            let genetic_config = GeneticConfig {
                weight_bound,
                ..genetic_config()
            };
            assert!(matches!(
                EvolutionController::new(
                    config(4),
                    genetic_config,
                    topology(),
                    Recorder::default(),
                    0
                ),
                Err(EvolutionError::Config(ConfigError::NegativeSeverity {
                    field: "weight_bound",
                    ..
                }))
            ));
        }
    }

    #[test]
    fn load_resumes_at_given_generation() {
        let mut controller = controller(config(3));
        let mut pool = identical_pool(3);
        pool[1].set_fitness(9.0);
        controller.load_generation(5, topology(), pool).unwrap();

        assert_eq!(controller.generation(), 5);
        assert_eq!(controller.state(), ControllerState::Evaluating);
        assert_eq!(controller.simulation().calls.len(), 6);
        let population = controller.population().unwrap();
        assert!(population.genomes().iter().all(|g| g.fitness() == 0.0));
        assert!(population
            .genomes()
            .iter()
            .all(|g| Arc::ptr_eq(g.topology(), controller.topology())));

        evaluate(&mut controller).unwrap();
        assert_eq!(controller.generation(), 6);
    }

    #[test]
    fn duplicates_are_remediated() {
        let config = EvolutionConfig {
            proportion_unchanged: 0.0,
            new_dna_rate: 0.0,
            mutation_rate: 0.0,
            mutate_clones: true,
            clone_mutation_severity: 0.5,
            ..config(4)
        };
        let mut controller = controller(config);
        let pool = identical_pool(4);
        let original = pool[0].clone();
        controller.load_generation(1, topology(), pool).unwrap();

        let record = evaluate(&mut controller).unwrap();
        assert_eq!(
            record.remediation,
            RemediationReport {
                duplicates: 4,
                mutated: 4
            }
        );
        let population = controller.population().unwrap();
        for genome in population.genomes() {
            assert!(!genome.values_equal(&original));
            assert_eq!(genome.heritage(), Heritage::MutatedOffspring);
        }
    }

    #[test]
    fn diagnostics_detect_stagnation() {
        let config = EvolutionConfig {
            proportion_unchanged: 0.0,
            new_dna_rate: 0.0,
            mutation_rate: 0.0,
            report_diagnostics: true,
            ..config(4)
        };
        let mut controller = controller(config);
        controller
            .load_generation(1, topology(), identical_pool(4))
            .unwrap();

        let report = evaluate(&mut controller).unwrap().diagnostics.unwrap();
        assert_eq!(report.expected_unique, 4);
        assert_eq!(report.stagnant.get(Heritage::Offspring), 4);
        assert_eq!(report.clone_clusters, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn breeding_failure_halts() {
        let config = EvolutionConfig {
            degenerate_selection: DegenerateSelection::Fail,
            ..config(4)
        };
        let mut controller = controller(config);
        controller.seed().unwrap();
        let individuals: Vec<_> = controller.individuals().collect();
        for individual in &individuals[..3] {
            controller.individual_finished(*individual, 0.0).unwrap();
        }
        assert_eq!(
            controller.individual_finished(individuals[3], 0.0),
            Err(EvolutionError::DegenerateSelection { total_fitness: 0.0 })
        );

        assert_eq!(controller.state(), ControllerState::Halted);
        assert_eq!(
            controller.individual_finished(individuals[0], 1.0),
            Err(EvolutionError::Halted)
        );
        assert_eq!(
            controller.load_generation(1, topology(), identical_pool(4)),
            Err(EvolutionError::Halted)
        );
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let run = || {
            let mut controller = controller(config(8));
            controller.seed().unwrap();
            for _ in 0..3 {
                evaluate(&mut controller).unwrap();
            }
            controller.population().unwrap().clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn logger_snapshots_each_generation() {
        let mut controller = controller(config(4)).with_logger(ReportingLevel::NoGenomes);
        controller.seed().unwrap();
        evaluate(&mut controller).unwrap();
        evaluate(&mut controller).unwrap();

        let logs: Vec<_> = controller.logger().unwrap().iter().collect();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].generation_number, 2);
        assert_eq!(logs[0].fitness.unwrap().maximum, 4.0);
        assert_eq!(logs[0].heritage.get(Heritage::New), 4);
    }
}
