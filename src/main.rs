use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use perseg::script::ScriptRunner;
use perseg::{AddMax, AddMin, AddSum, AssignSum, PoolConfig, ScalarAction};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "perseg", about = "Persistent lazy segment tree driver")]
struct Cli {
    /// Log pool growth and version creation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a command script against a ledger of tree versions.
    Run {
        /// Script file (reads stdin when omitted).
        script: Option<PathBuf>,
        /// Element algebra.
        #[arg(long, value_enum, default_value_t = Algebra::AddSum)]
        algebra: Algebra,
        /// Capacity of the first node block.
        #[arg(long, default_value_t = PoolConfig::DEFAULT_BLOCK_CAPACITY)]
        block_capacity: usize,
        /// Growth factor between consecutive node blocks.
        #[arg(long, default_value_t = PoolConfig::DEFAULT_GROWTH_FACTOR)]
        growth: f64,
        /// Print the pool profile after the script finishes.
        #[arg(long)]
        stats: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Algebra {
    /// Range add, range sum
    AddSum,
    /// Range add, range minimum
    AddMin,
    /// Range add, range maximum
    AddMax,
    /// Range assign, range sum
    AssignSum,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            script,
            algebra,
            block_capacity,
            growth,
            stats,
        } => {
            let config = PoolConfig::new(block_capacity, growth)
                .context("invalid pool configuration")?;
            let input = open_script(script.as_ref())?;
            match algebra {
                Algebra::AddSum => run_script::<AddSum>(&config, input, stats)?,
                Algebra::AddMin => run_script::<AddMin>(&config, input, stats)?,
                Algebra::AddMax => run_script::<AddMax>(&config, input, stats)?,
                Algebra::AssignSum => run_script::<AssignSum>(&config, input, stats)?,
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "perseg=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_script(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn run_script<M: ScalarAction>(config: &PoolConfig, input: Box<dyn BufRead>, stats: bool) -> Result<()> {
    let mut runner = ScriptRunner::<M>::new(config);
    let stdout = io::stdout();
    runner
        .run(input, stdout.lock())
        .context("script execution failed")?;

    if stats {
        eprintln!("{}", runner.profile().report());
    }

    Ok(())
}
