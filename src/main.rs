//! Hegemon - Entry Point
//!
//! Headless runner: builds or loads a site registry, runs the tribute
//! simulation for the configured horizon, and prints each polity's
//! chronicle (or the full output as JSON).

use std::path::PathBuf;

use clap::Parser;

use hegemon::core::config::EngineConfig;
use hegemon::core::error::Result;
use hegemon::narrative::{NameBook, NarrativeAssembler, NarrativeStyle};
use hegemon::sim::{simulate, SiteRegistry};

#[derive(Parser, Debug)]
#[command(name = "hegemon")]
#[command(about = "Run the tribute simulation and print polity chronicles")]
struct Args {
    /// Registry TOML file of [[site]] tables; omit to generate a demo
    /// registry
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Engine config TOML file; omit for defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site count for the generated demo registry
    #[arg(long, default_value_t = 12)]
    sites: u32,

    /// Ticks to simulate (overrides the config file)
    #[arg(long)]
    ticks: Option<u32>,

    /// Random seed for deterministic runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Dump the full simulation output as JSON instead of chronicles
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hegemon=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.horizon = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let registry = match &args.registry {
        Some(path) => SiteRegistry::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => SiteRegistry::generate(args.sites, config.seed)?,
    };

    let output = simulate(&registry, &config)?;

    if args.json {
        println!("{}", output.to_json());
        return Ok(());
    }

    println!("{}\n", output.summary());

    let names = NameBook::generate(&registry, config.seed);
    let assembler = NarrativeAssembler::new(&output.log, &names)
        .with_style(NarrativeStyle::Digest)
        .with_min_prominence(config.min_prominence);

    for (actor, narrative) in assembler.narrate_all()? {
        println!("=== {} ===", names.name(actor));
        println!("{}\n", narrative);
    }

    Ok(())
}
