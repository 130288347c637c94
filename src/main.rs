//! plate-globe: builds a plate-tectonics world from a seed, runs a sequence of
//! world steps and prints a summary.

use clap::Parser;
use log::info;
use plate_globe::controls::Trigger;
use plate_globe::report::format_report;
use std::error::Error;
use std::path::PathBuf;
use tectosphere::{World, WorldConfig};

#[derive(Parser)]
#[command(name = "plate-globe")]
#[command(version, about = "Icosphere plate-tectonics generator")]
struct Cli {
    /// World configuration (TOML); defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the world seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Overrides the subdivision level.
    #[arg(short, long)]
    level: Option<u32>,

    /// Overrides the plate count.
    #[arg(short, long)]
    plates: Option<usize>,

    /// Writes the effective configuration to this file and continues.
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Steps to run after the world is built: reset[:seed], relax, tweak,
    /// distort[:n], settle, recreate-plates, grow.
    steps: Vec<Trigger>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => WorldConfig::load_from_file(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.world.seed = seed;
    }
    if let Some(level) = cli.level {
        config.world.subdivision_level = level;
    }
    if let Some(plates) = cli.plates {
        config.world.plate_count = plates;
    }
    config.validate()?;

    if let Some(path) = &cli.write_config {
        config.save_to_file(path)?;
        info!("Configuration written to {}", path.display());
    }

    let mut world = World::new(config);
    for step in cli.steps {
        step.apply(&mut world);
    }

    print!("{}", format_report(&world.stats()));
    Ok(())
}
