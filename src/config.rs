// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Stage configuration system

use crate::citygml::MergeConfig;
use crate::elevate::DrapeConfig;
use crate::semantic::ClassifierConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file used when none is given
pub const CONFIG_ENV: &str = "CITYFORGE_CONFIG";
/// Environment variable that turns on debug logging
pub const DEBUG_ENV: &str = "CITYFORGE_DEBUG";

/// Tunables for all three stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Verbose per-file tracing
    pub debug: bool,
    pub drape: DrapeConfig,
    pub classifier: ClassifierConfig,
    pub merge: MergeConfig,
}

impl PipelineConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit file if given, else the one named by
    /// `CITYFORGE_CONFIG`, else defaults; then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(debug) = std::env::var(DEBUG_ENV) {
            config.debug = parse_flag(&debug).unwrap_or(config.debug);
        }

        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject values the stages cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.classifier.histogram_bins == 0 {
            bail!("classifier.histogram_bins must be at least 1");
        }
        if self.drape.bottom_tolerance.is_nan() || self.drape.bottom_tolerance < 0.0 {
            bail!("drape.bottom_tolerance must be a non-negative number");
        }
        if self.classifier.ground_tolerance.is_nan() || self.classifier.ground_tolerance < 0.0 {
            bail!("classifier.ground_tolerance must be a non-negative number");
        }
        if self.merge.name.is_empty() {
            bail!("merge.name must not be empty");
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
