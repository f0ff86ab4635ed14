// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Drape building meshes onto a terrain model

use anyhow::{bail, Context, Result};
use clap::Parser;
use cityforge::cli::{self, Reporter};
use cityforge::{stats, Elevator, PipelineConfig, RasterHandle};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cityforge-elevate", version)]
#[command(about = "Shift OBJ building meshes so their base sits on the terrain", long_about = None)]
struct Cli {
    /// Directory containing the OBJ files to elevate
    #[arg(long, value_name = "DIR")]
    input: PathBuf,

    /// Directory for the elevated OBJ files
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// Terrain raster (GeoTIFF or ESRI ASCII grid)
    #[arg(long, value_name = "FILE")]
    dtm: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write run statistics as JSON
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
    cli::init_logging(config.debug);

    if !args.input.is_dir() {
        bail!("input directory does not exist: {}", args.input.display());
    }
    if !args.dtm.is_file() {
        bail!("DTM file does not exist: {}", args.dtm.display());
    }

    Reporter::banner("elevate");
    let raster = RasterHandle::open(&args.dtm)
        .with_context(|| format!("Failed to load DTM {}", args.dtm.display()))?;
    info!("DTM loaded: {}", raster.describe());

    let mut elevator = Elevator::new(raster, config.drape);
    let progress = cli::progress_bar(config.debug);
    let found = elevator.run(&args.input, &args.output, progress.as_ref())?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let (run, elevation) = elevator.into_stats();
    if found == 0 {
        Reporter::report_warning(&format!(
            "No OBJ files found in {}",
            args.input.display()
        ));
    } else {
        Reporter::report_elevation(&run, &elevation);
    }

    if let Some(path) = &args.report {
        stats::write_report(path, "elevate", &run, &elevation)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Reporter::report_info(&format!("Report written to {}", path.display()));
    }

    if run.processed > 0 {
        Reporter::success(&format!(
            "Elevated {} files into {}",
            run.processed,
            args.output.display()
        ));
    }
    Ok(())
}
