use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use manzini::{FmIndex, FmIndexError};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "manzini", about = "Succinct FM-index over binary sequences")]
struct Cli {
    /// File holding the sequence (ASCII 0/1, trailing whitespace ignored).
    #[arg(long, short)]
    input: PathBuf,

    /// Pattern to search for; occurrence offsets are printed one per line.
    #[arg(long, short)]
    pattern: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if err
                .downcast_ref::<FmIndexError>()
                .is_some_and(FmIndexError::is_invalid_input)
            {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let contents = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read sequence from {}", cli.input.display()))?;
    let sequence = contents.trim_end();

    let index = FmIndex::build(sequence.as_bytes())?;
    println!(
        "indexed {} symbols ({} rows, sample step {})",
        index.len(),
        index.rows(),
        index.sample_step()
    );

    if let Some(pattern) = &cli.pattern {
        let offsets = index.occurrences(pattern.as_bytes())?;
        println!("{} occurrences of {pattern}", offsets.len());
        for offset in offsets {
            println!("{offset}");
        }
    }

    Ok(())
}
