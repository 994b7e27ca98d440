//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.order-insights.toml` files.

use crate::analysis::InsightSettings;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".order-insights.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "customer_order_analysis_report.txt".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Number of top spenders to list.
    #[serde(default = "default_top_spenders")]
    pub top_spenders: i64,

    /// Category whose customers get their own insight line.
    #[serde(default = "default_spotlight")]
    pub spotlight_category: String,

    /// Category pair for the overlap insight.
    #[serde(default = "default_overlap")]
    pub overlap: [String; 2],

    /// Echo the rendered report to stdout.
    #[serde(default)]
    pub print_to_stdout: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            top_spenders: default_top_spenders(),
            spotlight_category: default_spotlight(),
            overlap: default_overlap(),
            print_to_stdout: false,
        }
    }
}

fn default_top_spenders() -> i64 {
    3
}

fn default_spotlight() -> String {
    "Electronics".to_string()
}

fn default_overlap() -> [String; 2] {
    ["Electronics".to_string(), "Clothing".to_string()]
}

impl ReportConfig {
    /// The insight settings handed to the aggregator.
    pub fn insight_settings(&self) -> InsightSettings {
        InsightSettings {
            top_n: self.top_spenders,
            spotlight_category: self.spotlight_category.clone(),
            overlap: self.overlap.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.order-insights.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(top) = args.top {
            self.report.top_spenders = top;
        }
        if let Some(ref spotlight) = args.spotlight {
            self.report.spotlight_category = spotlight.clone();
        }
        if let Some([left, right]) = args.overlap.as_deref() {
            self.report.overlap = [left.clone(), right.clone()];
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
        if args.stdout {
            self.report.print_to_stdout = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
