mod arena;
mod settings;

use arena::{xor_cases, XorArena, PERFECT_FITNESS};
use settings::RunFile;

use genepool::genomics::{Colour, Heritage, HeritagePalette};
use genepool::logging::{GenerationMemberRecord, ReportingLevel};
use genepool::{EvolutionController, Population};

use anyhow::Context;
use clap::Parser;
use log::info;

use std::path::PathBuf;

/// Evolves a small feed-forward network that computes XOR.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Maximum number of generations to evaluate
    #[arg(short = 'g', long, default_value = "200")]
    generations: usize,

    /// TOML run file; built-in settings are used if absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the run's random source
    #[arg(short, long)]
    seed: Option<u64>,

    /// Resume from a generation saved with --save
    #[arg(short, long)]
    resume: Option<PathBuf>,

    /// Save the last generation here, in RON
    #[arg(long)]
    save: Option<PathBuf>,
}

fn palette() -> HeritagePalette {
    HeritagePalette::uniform(Colour::rgb(0x80, 0x80, 0x80))
        .with(Heritage::New, Colour::rgb(0x2e, 0x86, 0xde))
        .with(Heritage::UnchangedEliteCarryover, Colour::rgb(0xf1, 0xc4, 0x0f))
        .with(Heritage::MutatedElite, Colour::rgb(0xe6, 0x7e, 0x22))
        .with(Heritage::Offspring, Colour::rgb(0x27, 0xae, 0x60))
        .with(Heritage::MutatedOffspring, Colour::rgb(0x8e, 0x44, 0xad))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut run = match &args.config {
        Some(path) => RunFile::load(path)?,
        None => RunFile::default(),
    };
    if args.seed.is_some() {
        run.evolution.seed = args.seed;
    }
    let topology = run.topology()?;

    let arena = XorArena::new(&topology);
    let mut controller =
        EvolutionController::new(run.evolution, run.genetics, topology, arena, xor_cases())?
            .with_palette(palette())
            .with_logger(ReportingLevel::PopulationChampion);

    match &args.resume {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let population: Population = ron::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let (generation, topology, genomes) = population.into_parts();
            controller.load_generation(generation, topology, genomes)?;
        }
        None => controller.seed()?,
    }

    let mut solved = false;
    for _ in 0..args.generations {
        let reporter = controller.reporter();
        controller.simulation_mut().run_episodes(&reporter);
        for record in controller.process_reports()? {
            if let Some(stats) = record.fitness {
                info!(
                    "generation {} bred {:?}, {} clones mutated",
                    record.generation, record.plan, record.remediation.mutated
                );
                solved |= (stats.maximum - PERFECT_FITNESS).abs() < f32::EPSILON;
            }
        }
        if solved {
            break;
        }
    }

    let champion = controller
        .logger()
        .and_then(|logger| logger.iter().last())
        .and_then(|log| match &log.generation_sample {
            GenerationMemberRecord::PopulationChampion(champion) => Some((log, champion)),
            _ => None,
        });
    match champion {
        Some((log, champion)) => println!(
            "{} in generation {}, champion {} ({}): {}",
            if solved { "Solution found" } else { "No solution" },
            log.generation_number,
            champion.heritage(),
            controller.palette().colour_of(champion.heritage()),
            ron::to_string(champion)?
        ),
        None => println!("No generation was evaluated"),
    }

    if let Some(path) = &args.save {
        if let Some(population) = controller.population() {
            std::fs::write(path, ron::to_string(population)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("saved generation {} to {}", population.generation(), path.display());
        }
    }
    Ok(())
}
