//! Normalize a raw completion from a file or stdin and print the answer JSON.
//!
//! Usage:
//!   cargo run --bin normalize -- --input completion.txt
//!   echo '{"summary":"..."}' | cargo run --bin normalize -- --language en --compact

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use answer_normalizer::{Config, FallbackContext, Locale, Mode, Normalizer};
use clap::Parser;

#[derive(Parser)]
#[command(name = "normalize")]
#[command(about = "Turn raw model output into a schema-complete answer", long_about = None)]
struct Cli {
    /// Read the completion from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,
    /// Fallback text set: counsel or mybody
    #[arg(long, default_value = "counsel")]
    mode: String,
    /// Answer language (ko or en); defaults to the configured language
    #[arg(long)]
    language: Option<String>,
    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    answer_normalizer::init_tracing();
    let mut config = Config::load()?;

    if let Some(lang) = cli.language.as_deref() {
        config.pipeline.language = Locale::parse(lang)
            .with_context(|| format!("unsupported language '{lang}' (expected ko or en)"))?;
    }

    let raw = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let normalizer = Normalizer::new(config.pipeline);
    let answer = normalizer.normalize_with(&raw, &FallbackContext::new(Mode::parse(&cli.mode)));

    let out = if cli.compact {
        serde_json::to_string(&answer)?
    } else {
        serde_json::to_string_pretty(&answer)?
    };
    println!("{out}");
    Ok(())
}
