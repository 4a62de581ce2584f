//! Command-line entry point for the resonance engine.
//!
//! # Responsibility
//! - Load a JSON corpus and print derived structures as JSON.
//! - Exercise engine wiring locally, outside any UI host.

use clap::{Args, Parser, Subcommand};
use log::error;
use resonance_core::{
    core_version, default_log_level, init_logging, obfuscate, Corpus, EngineConfig,
    InMemoryDiscoveryRepository, ResonanceService, SurfacePreset,
};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "resonance", version, about = "Content resonance engine CLI")]
struct Cli {
    /// Absolute directory for rolling log files; logging stays off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pruned similarity graph
    Graph(CorpusArgs),
    /// Print layout nodes
    Layout(CorpusArgs),
    /// Print the echo pick for one item
    Echo(EchoArgs),
    /// Pick one id, weighted toward the most recent
    Tune(TuneArgs),
    /// Mask a text the way undiscovered previews are masked
    Obfuscate(ObfuscateArgs),
    /// Print the core version
    Version,
}

#[derive(Args)]
struct CorpusArgs {
    /// JSON file holding an array of content items
    corpus: PathBuf,
    /// Surface preset (atlas|archive|echo)
    #[arg(long, default_value = "atlas")]
    preset: String,
    /// Optional JSON config overriding the preset
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct EchoArgs {
    #[command(flatten)]
    corpus: CorpusArgs,
    /// Id of the item currently being read
    id: String,
}

#[derive(Args)]
struct TuneArgs {
    /// Ids ordered most recent first
    ids: Vec<String>,
}

#[derive(Args)]
struct ObfuscateArgs {
    text: String,
    /// Seed key, usually the item id
    key: String,
    /// Fraction of letters and digits left readable, 0..=1
    #[arg(default_value_t = 0.0)]
    ratio: f64,
    #[arg(long, default_value_t = resonance_core::DEFAULT_MASK_GLYPH)]
    mask: char,
}

fn main() {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: {err}");
        }
    }

    if let Err(err) = run(cli.command) {
        error!("event=cli_run module=cli status=error error={err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    let output = match command {
        Commands::Graph(args) => {
            let (service, corpus) = load(&args)?;
            json!({ "edges": service.map(&corpus).edges })
        }
        Commands::Layout(args) => {
            let (service, corpus) = load(&args)?;
            json!({ "nodes": service.map(&corpus).nodes })
        }
        Commands::Echo(args) => {
            let (service, corpus) = load(&args.corpus)?;
            let echo = service.echo_for_id(&args.id, &corpus)?;
            json!({ "current": args.id, "echo": echo.id, "title": echo.title })
        }
        Commands::Tune(args) => {
            let service = ResonanceService::for_surface(
                SurfacePreset::Atlas,
                InMemoryDiscoveryRepository::new(),
            );
            json!({ "picked": service.tune(&args.ids) })
        }
        Commands::Obfuscate(args) => {
            json!({ "text": obfuscate(&args.text, &args.key, args.ratio, args.mask) })
        }
        Commands::Version => json!({ "version": core_version() }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load(
    args: &CorpusArgs,
) -> Result<(ResonanceService<InMemoryDiscoveryRepository>, Corpus), Box<dyn Error>> {
    let config = match args.config.as_ref() {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => args.preset.parse::<SurfacePreset>()?.config(),
    };
    let corpus = Corpus::from_json_file(&args.corpus)?;
    let service = ResonanceService::new(config, InMemoryDiscoveryRepository::new());
    Ok((service, corpus))
}
