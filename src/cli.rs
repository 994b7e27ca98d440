//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Order Insights - customer order analysis reports
///
/// Groups the built-in order data by customer and category, classifies
/// customers by total spend and writes a summary report.
///
/// Examples:
///   order-insights
///   order-insights --output report.json --format json
///   order-insights --top 5 --spotlight Clothing
///   order-insights --overlap "Clothing,Home Essentials"
///   order-insights --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Output file path for the report
    ///
    /// Defaults to the config file setting, or customer_order_analysis_report.txt
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Number of top spenders to list
    #[arg(long, value_name = "COUNT", allow_negative_numbers = true)]
    pub top: Option<i64>,

    /// Category whose customers are listed in the insights section
    #[arg(long, value_name = "CATEGORY")]
    pub spotlight: Option<String>,

    /// Category pair for the overlap insight (comma-separated)
    ///
    /// Example: --overlap Electronics,Clothing
    #[arg(long, value_name = "A,B", value_delimiter = ',')]
    pub overlap: Option<Vec<String>>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .order-insights.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "ORDER_INSIGHTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Also print the rendered report to stdout
    #[arg(long)]
    pub stdout: bool,

    /// Generate a default .order-insights.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref pair) = self.overlap {
            if pair.len() != 2 {
                return Err(format!(
                    "--overlap takes exactly two categories, got {}",
                    pair.len()
                ));
            }
            if pair.iter().any(|c| c.trim().is_empty()) {
                return Err("--overlap categories must not be empty".to_string());
            }
        }

        if let Some(ref spotlight) = self.spotlight {
            if spotlight.trim().is_empty() {
                return Err("--spotlight category must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Whether status lines such as the completion message are printed.
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
