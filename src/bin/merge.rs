// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Merge per-building CityGML documents into one tile

use anyhow::{bail, Context, Result};
use clap::Parser;
use cityforge::cli::{self, Reporter};
use cityforge::{stats, Merger, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cityforge-merge", version)]
#[command(about = "Merge the CityGML files of a directory into a single CityModel", long_about = None)]
struct Cli {
    /// Directory containing the CityGML files
    #[arg(long, value_name = "DIR")]
    input: PathBuf,

    /// Merged CityGML file to write
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Name of the merged model, also replaces `UUID` identifier prefixes
    #[arg(long)]
    name: Option<String>,

    /// Author written into object descriptions
    #[arg(long)]
    author: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write merge statistics as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Per-file debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args: Cli = cli::parse_args();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Reporter::report_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<()> {
    let mut config = PipelineConfig::load(args.config.as_deref())?;
    config.debug |= args.debug;
    if let Some(name) = args.name {
        config.merge.name = name;
    }
    if let Some(author) = args.author {
        config.merge.author = author;
    }
    config.validate()?;
    cli::init_logging(config.debug);

    if !args.input.is_dir() {
        bail!("input directory does not exist: {}", args.input.display());
    }

    Reporter::banner("merge");
    let mut merger = Merger::new(config.merge.clone());
    let progress = cli::progress_bar(config.debug);
    let result = merger
        .merge(&args.input, &args.output, progress.as_ref())
        .map(|_| ());
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    // The summary is printed on failure too, before the error
    let (run, summary) = merger.into_stats();
    Reporter::report_merge(&run, &summary);
    result.with_context(|| format!("Failed to merge {}", args.input.display()))?;

    if let Some(path) = &args.report {
        stats::write_report(path, "merge", &run, &summary)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Reporter::report_info(&format!("Report written to {}", path.display()));
    }

    Reporter::success(&format!(
        "Merged {} city objects into {}",
        summary.city_objects,
        args.output.display()
    ));
    Ok(())
}
