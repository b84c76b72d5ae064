//! CSV conversion pipeline
//!
//! Walks a directory of merged filing exports, resolves every issuer name
//! and writes `<stem>_with_tickers.csv` next to each input with the columns
//! `nameOfIssuer, Symbol, Source`.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};

use crate::resolver::Resolver;

/// Default filename suffix of the merged filing exports
pub const DEFAULT_INPUT_SUFFIX: &str = "_all_quarters_merged.csv";

const OUTPUT_SUFFIX: &str = "_with_tickers.csv";

/// Aggregate statistics over a conversion run
#[derive(Debug, Default)]
pub struct ConversionSummary {
    pub files_processed: usize,
    pub rows_processed: usize,
    pub rows_matched: usize,
    pub unmatched_names: BTreeSet<String>,
}

impl ConversionSummary {
    pub fn match_rate(&self) -> f64 {
        if self.rows_processed == 0 {
            0.0
        } else {
            self.rows_matched as f64 / self.rows_processed as f64
        }
    }
}

/// Convert every matching CSV file in a directory.
pub async fn convert_csv_files(
    resolver: &Resolver,
    dir: &Path,
    suffix: &str,
    use_online: bool,
) -> Result<ConversionSummary> {
    let files = find_input_files(dir, suffix)?;
    if files.is_empty() {
        log::warn!(
            "No CSV files matching '*{}' found in {}",
            suffix,
            dir.display()
        );
        return Ok(ConversionSummary::default());
    }

    log::info!("Found {} CSV file(s) to process", files.len());

    let mut summary = ConversionSummary::default();
    for file in files {
        log::info!("Processing {}", file.display());
        match convert_file(resolver, &file, use_online, &mut summary).await {
            Ok(()) => summary.files_processed += 1,
            Err(e) => log::error!("Failed to process {}: {}", file.display(), e),
        }
    }

    Ok(summary)
}

/// Files in `dir` whose name ends with `suffix`, sorted for stable order
fn find_input_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let matches_suffix = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(suffix))
            .unwrap_or(false);
        if matches_suffix {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

async fn convert_file(
    resolver: &Resolver,
    input: &Path,
    use_online: bool,
    summary: &mut ConversionSummary,
) -> Result<()> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers()?.clone();
    let Some(name_column) = find_issuer_column(&headers) else {
        log::warn!(
            "No issuer-name column in {} (available: {:?})",
            input.display(),
            headers.iter().collect::<Vec<_>>()
        );
        return Ok(());
    };

    let names: Vec<String> = reader
        .records()
        .filter_map(|record| record.ok())
        .map(|record| record.get(name_column).unwrap_or("").to_string())
        .collect();

    log::info!("Resolving {} issuer names...", names.len());

    let output_path = output_path(input);
    let out_file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(out_file);
    writer.write_record(["nameOfIssuer", "Symbol", "Source"])?;

    let mut matched = 0usize;
    for (i, name) in names.iter().enumerate() {
        if i > 0 && i % 10 == 0 {
            log::info!("Progress: {}/{}", i, names.len());
        }

        let result = resolver.resolve(name, use_online).await;
        if result.is_found() {
            matched += 1;
        } else if !name.trim().is_empty() {
            summary.unmatched_names.insert(name.trim().to_string());
        }

        writer.write_record([
            name.as_str(),
            result.ticker.as_deref().unwrap_or(""),
            result.source.as_str(),
        ])?;
    }
    writer.flush()?;

    summary.rows_processed += names.len();
    summary.rows_matched += matched;

    log::info!(
        "Wrote {}: {}/{} rows matched ({:.1}%)",
        output_path.display(),
        matched,
        names.len(),
        if names.is_empty() {
            0.0
        } else {
            matched as f64 / names.len() as f64 * 100.0
        }
    );

    Ok(())
}

/// Locate the issuer-name column; filing exports vary between
/// "nameOfIssuer" and truncated "nameOfIssue" headers.
fn find_issuer_column(headers: &csv::StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.contains("nameOfIssuer") || h.contains("nameOfIssue"))
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}{}", stem, OUTPUT_SUFFIX))
}

/// Print the run summary the way the operator expects to read it.
pub fn print_summary(summary: &ConversionSummary) {
    println!();
    println!("Processed files:   {}", summary.files_processed);
    println!("Processed records: {}", summary.rows_processed);
    println!("Matched tickers:   {}", summary.rows_matched);
    println!("Match rate:        {:.1}%", summary.match_rate() * 100.0);

    if !summary.unmatched_names.is_empty() {
        println!();
        println!("Unmatched companies ({} total):", summary.unmatched_names.len());
        for (i, name) in summary.unmatched_names.iter().take(15).enumerate() {
            println!("  {:2}. {}", i + 1, name);
        }
        if summary.unmatched_names.len() > 15 {
            println!("  ... {} more not shown", summary.unmatched_names.len() - 15);
        }
    }
}
