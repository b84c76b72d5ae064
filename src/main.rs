//! Command-line entry point: resolve issuer names in filing CSV exports
//! to ticker symbols.

use std::path::{Path, PathBuf};

use anyhow::Result;

use ticker_resolver::pipeline;
use ticker_resolver::registry::Registry;
use ticker_resolver::resolver::Resolver;

const PRIMARY_FEED: &str = "company_tickers_exchange.json";
const SECONDARY_FEED: &str = "company_tickers.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut dir = PathBuf::from(".");
    let mut suffix = pipeline::DEFAULT_INPUT_SUFFIX.to_string();
    let mut use_online = true;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--suffix" => {
                if let Some(s) = args.next() {
                    suffix = s;
                }
            }
            "--offline" => use_online = false,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => dir = PathBuf::from(other),
        }
    }

    if !check_required_files() {
        return Ok(());
    }

    let registry = Registry::load(Path::new(PRIMARY_FEED), Path::new(SECONDARY_FEED));
    let resolver = Resolver::new(registry);

    let summary = pipeline::convert_csv_files(&resolver, &dir, &suffix, use_online).await?;
    pipeline::print_summary(&summary);

    Ok(())
}

/// Both SEC feed files have to be present in the working directory.
fn check_required_files() -> bool {
    let missing: Vec<&str> = [PRIMARY_FEED, SECONDARY_FEED]
        .into_iter()
        .filter(|f| !Path::new(f).exists())
        .collect();

    if missing.is_empty() {
        return true;
    }

    println!("Missing required feed files:");
    for file in &missing {
        println!("  - {}", file);
    }
    println!();
    println!("Download them from:");
    println!("  - https://www.sec.gov/files/company_tickers.json");
    println!("  - https://www.sec.gov/files/company_tickers_exchange.json");
    false
}

fn print_usage() {
    println!("Usage: ticker-resolver [DIR] [--suffix SUFFIX] [--offline]");
    println!();
    println!("Resolves the issuer names in DIR's '*{}' files", pipeline::DEFAULT_INPUT_SUFFIX);
    println!("and writes '<stem>_with_tickers.csv' next to each input.");
    println!();
    println!("  DIR              directory to scan (default: current directory)");
    println!("  --suffix SUFFIX  input filename suffix to match");
    println!("  --offline        skip online search, registry lookups only");
}
