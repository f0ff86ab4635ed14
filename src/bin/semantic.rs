// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Split building meshes into Roof, Wall and Ground material meshes

use anyhow::{bail, Context, Result};
use clap::Parser;
use cityforge::cli::{self, Reporter};
use cityforge::{io, stats, Colorizer, PipelineConfig};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cityforge-semantic", version)]
#[command(about = "Classify OBJ faces into Roof/Wall/Ground and write one OBJ/MTL pair per material", long_about = None)]
struct Cli {
    /// Directory containing the OBJ files to split
    #[arg(long, visible_alias = "input", value_name = "DIR")]
    obj_dir: PathBuf,

    /// Directory for the per-material OBJ and MTL files
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// Building footprints (GeoJSON FeatureCollection)
    #[arg(long, value_name = "FILE")]
    geojson: PathBuf,

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

    if !args.obj_dir.is_dir() {
        bail!("OBJ directory does not exist: {}", args.obj_dir.display());
    }
    if !args.geojson.is_file() {
        bail!("GeoJSON file does not exist: {}", args.geojson.display());
    }

    Reporter::banner("semantic");
    let footprints = io::read_footprints(&args.geojson)
        .with_context(|| format!("Failed to load footprints {}", args.geojson.display()))?;
    info!("Loaded {} building footprints", footprints.polygon_count);

    let mut colorizer = Colorizer::new(config.classifier.clone(), footprints);
    let progress = cli::progress_bar(config.debug);
    let found = colorizer.run(&args.obj_dir, &args.output, progress.as_ref())?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let (run, materials) = colorizer.into_stats();
    if found == 0 {
        Reporter::report_warning(&format!(
            "No OBJ files found in {}",
            args.obj_dir.display()
        ));
    } else {
        Reporter::report_semantic(&run, &materials);
    }

    if let Some(path) = &args.report {
        stats::write_report(path, "semantic", &run, &materials)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Reporter::report_info(&format!("Report written to {}", path.display()));
    }

    if run.processed > 0 {
        Reporter::success(&format!(
            "Wrote {} material meshes into {}",
            materials.total_split_files(),
            args.output.display()
        ));
    }
    Ok(())
}
