use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use revved_finder::{FinderConfig, RevvedFinder};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(
    name = "revved-finder",
    about = "Resolve asset references to their revved file names"
)]
struct Cli {
    /// Directory of the document making the references, relative to the listing root
    #[arg(long, default_value = ".")]
    base: String,
    /// Listing root, overriding the configured one
    #[arg(long)]
    root: Option<PathBuf>,
    /// Configuration file (defaults to revved.config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// References to resolve
    #[arg(required = true)]
    references: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => FinderConfig::load(path)?,
        None => FinderConfig::discover(&std::env::current_dir()?),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }

    let finder = RevvedFinder::new(config.to_lister());
    debug!(
        root = %finder.lister().root().display(),
        base = %cli.base,
        "resolving references"
    );
    for reference in &cli.references {
        let resolved = finder
            .find(reference, &cli.base)
            .with_context(|| format!("failed to resolve {reference}"))?;
        println!("{resolved}");
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("revved_finder={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
