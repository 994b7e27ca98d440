//! Order Insights - customer order analysis CLI
//!
//! Aggregates the built-in order data and writes a text or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Usage, configuration or runtime error
//!   2 - Aggregation failed (invalid record, unknown category, bad argument)
//!   3 - Report could not be rendered or written

use anyhow::{Context, Result};
use order_insights::cli::Args;
use order_insights::config::{Config, CONFIG_FILE_NAME};
use order_insights::data::{customer_roster, sample_orders};
use order_insights::report::{self, ReportMetadata};
use order_insights::{Aggregator, ReportError};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config)?;

    info!("Order Insights v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(&config) {
        Ok(path) => {
            if args.show_progress() {
                println!("✅ Report generated: {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("Report run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Aggregate the order data and write the report. Returns the report path.
fn run_report(config: &Config) -> Result<PathBuf, ReportError> {
    let start_time = Instant::now();

    let orders = sample_orders()?;
    info!("Loaded {} orders", orders.len());

    let aggregator = Aggregator::new(orders)?.with_roster(customer_roster());
    let summary = aggregator.run(&config.report.insight_settings())?;
    info!(
        "Aggregated {} customers across {} categories",
        summary.spending.len(),
        summary.categories.len()
    );

    let metadata = ReportMetadata::new(summary.order_count);
    let content = report::render_report(&summary, &metadata, config.report.format)?;

    if config.report.print_to_stdout {
        println!("{}", content);
    }

    let path = PathBuf::from(&config.general.output);
    report::write_report(&content, &path)?;

    debug!(
        "Report run finished in {:.1}ms",
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(path)
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {}. Using defaults.", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
