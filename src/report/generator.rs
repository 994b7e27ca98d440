//! Text and JSON report generation.
//!
//! Renders an already computed [`Summary`]. Nothing in here derives an
//! aggregate of its own.

use crate::analysis::Summary;
use crate::cli::OutputFormat;
use crate::error::ReportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

const RULE_WIDTH: usize = 50;

/// Metadata attached to JSON reports.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of orders aggregated.
    pub order_count: usize,
    /// Version of the tool that produced the report.
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(order_count: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            order_count,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    summary: &'a Summary,
}

/// Render the summary in the requested format.
pub fn render_report(
    summary: &Summary,
    metadata: &ReportMetadata,
    format: OutputFormat,
) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => generate_text_report(summary),
        OutputFormat::Json => generate_json_report(summary, metadata),
    }
}

/// Generate the plain-text report.
pub fn generate_text_report(summary: &Summary) -> Result<String, ReportError> {
    let mut lines = Vec::new();

    lines.push("E-COMMERCE CUSTOMER ORDER ANALYSIS REPORT".to_string());
    lines.push(format!("{}\n", "=".repeat(RULE_WIDTH)));

    lines.extend(generate_executive_summary(summary));
    lines.extend(generate_classification_section(summary)?);
    lines.extend(generate_category_revenue_section(summary));
    lines.extend(generate_insights_section(summary));

    Ok(lines.join("\n"))
}

fn section_header(title: &str) -> Vec<String> {
    vec![title.to_string(), "-".repeat(RULE_WIDTH)]
}

fn generate_executive_summary(summary: &Summary) -> Vec<String> {
    let mut section = section_header("1. Executive Summary");

    section.push(format!("Total Customers: {}", summary.total_customers));
    section.push(format!(
        "Total Unique Products: {}",
        summary.unique_products.len()
    ));
    section.push(format!(
        "Product Categories: {}",
        summary.categories.join(", ")
    ));
    section.push(format!(
        "Total Revenue: ${}\n",
        format_amount(summary.total_revenue)
    ));

    section
}

fn generate_classification_section(summary: &Summary) -> Result<Vec<String>, ReportError> {
    let mut section = section_header("2. Customer Classification");

    for (customer, total) in summary.spending.iter() {
        let class = summary.classification_of(customer)?;
        section.push(format!("{}: ${} ({})", customer, format_amount(*total), class));
    }
    section.push(String::new());

    Ok(section)
}

fn generate_category_revenue_section(summary: &Summary) -> Vec<String> {
    let mut section = section_header("3. Category-wise Revenue");

    for (category, revenue) in summary.category_revenue.iter() {
        section.push(format!("{}: ${}", category, format_amount(*revenue)));
    }
    section.push(String::new());

    section
}

fn generate_insights_section(summary: &Summary) -> Vec<String> {
    let mut section = section_header("4. Key Business Insights");

    let top: Vec<String> = summary
        .top_spenders
        .iter()
        .map(|(customer, total)| format!("{} (${})", customer, format_amount(*total)))
        .collect();
    section.push(format!(
        "Top {} Spenders: {}",
        summary.top_spenders.len(),
        if top.is_empty() {
            "none".to_string()
        } else {
            top.join(", ")
        }
    ));

    section.push(format!(
        "Customers who purchased {}: {}",
        summary.spotlight.category,
        join_names(&summary.spotlight.customers)
    ));
    section.push(format!(
        "Customers who bought from ALL categories: {}",
        join_names(&summary.multi_category_customers)
    ));

    let [left, right] = &summary.overlap.categories;
    section.push(format!(
        "Customers who bought both {} and {}: {}",
        left,
        right,
        join_names(&summary.overlap.customers)
    ));
    section.push(format!(
        "Unique Products Sold: {}\n",
        join_names(&summary.unique_products)
    ));

    section
}

fn join_names(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Format a money amount: whole numbers without decimals, otherwise two.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Generate a JSON report.
pub fn generate_json_report(
    summary: &Summary,
    metadata: &ReportMetadata,
) -> Result<String, ReportError> {
    let report = JsonReport { metadata, summary };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write rendered report content to `path`.
pub fn write_report(content: &str, path: &Path) -> Result<(), ReportError> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    std::fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Aggregator, InsightSettings};
    use crate::data::{customer_roster, sample_orders};
    use crate::error::AggregationError;

    fn create_test_summary() -> Summary {
        Aggregator::new(sample_orders().unwrap())
            .unwrap()
            .with_roster(customer_roster())
            .run(&InsightSettings::default())
            .unwrap()
    }

    #[test]
    fn test_generate_text_report_sections() {
        let report = generate_text_report(&create_test_summary()).unwrap();

        assert!(report.starts_with("E-COMMERCE CUSTOMER ORDER ANALYSIS REPORT"));
        assert!(report.contains("1. Executive Summary"));
        assert!(report.contains("2. Customer Classification"));
        assert!(report.contains("3. Category-wise Revenue"));
        assert!(report.contains("4. Key Business Insights"));
    }

    #[test]
    fn test_text_report_values() {
        let report = generate_text_report(&create_test_summary()).unwrap();

        assert!(report.contains("Total Customers: 6"));
        assert!(report.contains("Total Unique Products: 8"));
        assert!(report.contains("Product Categories: Electronics, Clothing, Home Essentials"));
        assert!(report.contains("Total Revenue: $2645"));
        assert!(report.contains("Bob: $85 (Moderate)"));
        assert!(report.contains("Frank: $890 (High-Value)"));
        assert!(report.contains("Electronics: $2220"));
        assert!(report.contains("Top 3 Spenders: Frank ($890), Alice ($820), David ($600)"));
        assert!(report.contains("Customers who purchased Electronics: Alice, David, Frank"));
        assert!(report.contains("Customers who bought from ALL categories: none"));
        assert!(report.contains("Customers who bought both Electronics and Clothing: none"));
    }

    #[test]
    fn test_classification_lines_follow_input_order() {
        let report = generate_text_report(&create_test_summary()).unwrap();
        let alice = report.find("Alice: $820").unwrap();
        let frank = report.find("Frank: $890").unwrap();
        assert!(alice < frank);
    }

    #[test]
    fn test_missing_classification_fails_rendering() {
        let mut summary = create_test_summary();
        summary.classification = Default::default();

        let err = generate_text_report(&summary).unwrap_err();

        assert!(matches!(
            err,
            ReportError::Aggregation(AggregationError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(820.0), "820");
        assert_eq!(format_amount(100.01), "100.01");
        assert_eq!(format_amount(0.5), "0.50");
    }

    #[test]
    fn test_generate_json_report() {
        let summary = create_test_summary();
        let json = generate_json_report(&summary, &ReportMetadata::new(summary.order_count))
            .unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"top_spenders\""));
        assert!(json.contains("\"High-Value\""));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        write_report("hello", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_report_failure_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");

        let err = write_report("hello", &path).unwrap_err();

        assert!(matches!(err, ReportError::Write { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
