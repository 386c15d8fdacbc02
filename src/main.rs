use anyhow::{Context, Result};
use clap::Parser;
use wildlands_core::metrics::init_logging;
use wildlands_lib::model::config::AppConfig;
use wildlands_lib::model::species::SpeciesCatalog;
use wildlands_lib::model::world::World;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Ticks to simulate (overrides the config file)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// RNG seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Species catalog JSON (defaults to the bundled catalog)
    #[arg(long)]
    species: Option<String>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    let catalog = match &args.species {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            SpeciesCatalog::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => SpeciesCatalog::bundled()?,
    };

    let ticks = config.simulation.ticks;
    let mut world = World::new(config, catalog)?;
    world.populate()?;
    println!("Running {ticks} ticks (seed {})...", world.seed);

    let summary = world.run(ticks)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("{}", serde_json::to_string_pretty(&world.species_report())?);
    println!(
        "Finished after {} ticks: {} animals, {} teams.",
        summary.ticks,
        world.population(),
        world.teams.len()
    );
    Ok(())
}
