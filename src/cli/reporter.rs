// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-of-run summaries for the stage binaries

use crate::citygml::MergeSummary;
use crate::semantic::Material;
use crate::stats::{ElevationStats, MaterialStats, RunStatistics};
use colored::{ColoredString, Colorize};
use std::time::Duration;

const RULE_WIDTH: usize = 72;

/// CLI reporter for end-of-run summaries
pub struct Reporter;

impl Reporter {
    /// Stage name and version above a rule
    pub fn banner(stage: &str) {
        println!(
            "{} {}",
            format!("cityforge {}", stage).bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
        );
        println!("{}", Self::rule());
    }

    /// Summary of a drape run
    pub fn report_elevation(run: &RunStatistics, stats: &ElevationStats) {
        Self::header("Elevation Summary");
        Self::report_run(run);

        if let (Some(min), Some(max), Some(avg)) = (stats.min, stats.max, stats.average()) {
            println!("\n{}", "Adjustments:".bold());
            Self::print_metric("Minimum", &format!("{:.3}", min));
            Self::print_metric("Maximum", &format!("{:.3}", max));
            Self::print_metric("Average", &format!("{:.3}", avg));
        }

        Self::report_failures(run);
        Self::footer();
    }

    /// Summary of a semantic split run
    pub fn report_semantic(run: &RunStatistics, materials: &MaterialStats) {
        Self::header("Semantic Summary");
        Self::report_run(run);

        println!("\n{}", "Split files:".bold());
        for material in Material::ALL {
            Self::print_metric(
                &format!("{} files", material),
                &materials.get(material).split_files.to_string(),
            );
        }
        Self::print_metric("Total", &materials.total_split_files().to_string());

        if materials.total_split_files() > 0 {
            println!("\n{}", "Vertex optimization:".bold());
            for material in Material::ALL {
                let counts = materials.get(material);
                if counts.split_files == 0 {
                    continue;
                }
                Self::print_metric(
                    material.name(),
                    &format!(
                        "{} → {} vertices ({:.1}% reduction)",
                        counts.original_vertices,
                        counts.optimized_vertices,
                        counts.reduction_percent()
                    ),
                );
            }
        }

        Self::report_failures(run);
        Self::footer();
    }

    /// Summary of a merge run
    pub fn report_merge(run: &RunStatistics, summary: &MergeSummary) {
        Self::header("Merge Summary");
        Self::report_run(run);

        println!("\n{}", "Merge:".bold());
        Self::print_metric("Files found", &summary.files_found.to_string());
        Self::print_metric("Files with bounds", &summary.files_with_bounds.to_string());
        Self::print_metric("City objects", &summary.city_objects.to_string());
        if let Some(bounds) = &summary.bounds {
            let (lo, hi) = (bounds.lower(), bounds.upper());
            Self::print_metric(
                "Envelope",
                &format!(
                    "({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
                    lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
                ),
            );
            if !bounds.srs.is_empty() {
                Self::print_metric("SRS", &bounds.srs);
            }
        }
        if let Some(output) = &summary.output {
            Self::print_metric("Output", &output.display().to_string());
        }

        Self::report_failures(run);
        Self::footer();
    }

    /// Fatal condition, on stderr
    pub fn report_error(message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    pub fn report_warning(message: &str) {
        println!("{} {}", "warning:".yellow().bold(), message);
    }

    pub fn report_info(message: &str) {
        println!("{} {}", "→".bright_blue(), message);
    }

    /// Closing line of a successful run
    pub fn success(message: &str) {
        println!("{} {}", "✔".green().bold(), message.green());
    }

    fn report_run(run: &RunStatistics) {
        Self::print_metric("Processed", &run.processed.to_string().green().to_string());
        let failed = run.failed().to_string();
        let failed = if run.failed() > 0 { failed.red() } else { failed.normal() };
        Self::print_metric("Failed", &failed.to_string());
        Self::print_metric("Time", &Self::format_duration(run.elapsed()).yellow().to_string());
    }

    fn report_failures(run: &RunStatistics) {
        if run.failures.is_empty() {
            return;
        }
        println!("\n{}", "Failed files:".red().bold());
        for failure in &run.failures {
            println!("  {} {}: {}", "-".red(), failure.file.cyan(), failure.error);
        }
    }

    fn header(title: &str) {
        println!("\n{}\n{}\n{}", Self::rule(), title.bold(), Self::rule());
    }

    fn footer() {
        println!("{}", Self::rule());
    }

    fn rule() -> ColoredString {
        "━".repeat(RULE_WIDTH).bright_black()
    }

    fn print_metric(name: &str, value: &str) {
        println!("  {} {}", format!("{}:", name).bright_black(), value);
    }

    /// Run time as `850ms`, `12.4s` or `3m 05s`
    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs_f64();
        if secs < 1.0 {
            format!("{}ms", duration.as_millis())
        } else if secs < 60.0 {
            format!("{:.1}s", secs)
        } else {
            let whole = duration.as_secs();
            format!("{}m {:02}s", whole / 60, whole % 60)
        }
    }
}
