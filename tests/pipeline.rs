//! Integration tests for the aggregation pipeline and report writer.

use order_insights::cli::OutputFormat;
use order_insights::data::{customer_roster, sample_orders};
use order_insights::report::{render_report, write_report, ReportMetadata};
use order_insights::{
    compute_category_revenue, compute_spending, group_by_customer, AggregationError, Aggregator,
    Classification, InsightSettings, Order, ReportError,
};

fn sample_aggregator() -> Aggregator {
    Aggregator::new(sample_orders().unwrap())
        .unwrap()
        .with_roster(customer_roster())
}

#[test]
fn test_end_to_end_text_report() {
    let summary = sample_aggregator().run(&InsightSettings::default()).unwrap();
    let metadata = ReportMetadata::new(summary.order_count);
    let content = render_report(&summary, &metadata, OutputFormat::Text).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("customer_order_analysis_report.txt");
    write_report(&content, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, content);
    assert!(written.contains("Eva: $105 (High-Value)"));
    assert!(written.contains("Home Essentials: $255"));
}

#[test]
fn test_end_to_end_json_report() {
    let summary = sample_aggregator().run(&InsightSettings::default()).unwrap();
    let metadata = ReportMetadata::new(summary.order_count);
    let content = render_report(&summary, &metadata, OutputFormat::Json).unwrap();

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["summary"]["spending"]["Frank"], 890.0);
    assert_eq!(value["summary"]["classification"]["Bob"], "Moderate");
    assert_eq!(value["summary"]["category_revenue"]["Clothing"], 170.0);
    assert_eq!(value["metadata"]["order_count"], 11);
}

#[test]
fn test_pipeline_is_idempotent() {
    let aggregator = sample_aggregator();
    let settings = InsightSettings::default();

    let first = aggregator.run(&settings).unwrap();
    let second = aggregator.run(&settings).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        order_insights::report::generate_text_report(&first).unwrap(),
        order_insights::report::generate_text_report(&second).unwrap()
    );
}

#[test]
fn test_conservation_across_pipeline() {
    let orders = sample_orders().unwrap();
    let order_total: f64 = orders.iter().map(|o| o.price).sum();

    let spending = compute_spending(&group_by_customer(&orders));
    let revenue = compute_category_revenue(&orders);

    assert_eq!(spending.values().sum::<f64>(), order_total);
    assert_eq!(revenue.values().sum::<f64>(), order_total);
}

#[test]
fn test_boundary_customers() {
    let orders = vec![
        Order::new("Low", "Pen", 49.99, "Stationery").unwrap(),
        Order::new("Floor", "Lamp", 50.0, "Home").unwrap(),
        Order::new("Ceiling", "Chair", 100.0, "Home").unwrap(),
        Order::new("High", "Desk", 100.01, "Home").unwrap(),
    ];
    let settings = InsightSettings {
        spotlight_category: "Home".to_string(),
        overlap: ["Home".to_string(), "Stationery".to_string()],
        ..InsightSettings::default()
    };

    let summary = Aggregator::new(orders).unwrap().run(&settings).unwrap();

    assert_eq!(summary.classification_of("Low"), Ok(Classification::LowValue));
    assert_eq!(summary.classification_of("Floor"), Ok(Classification::Moderate));
    assert_eq!(summary.classification_of("Ceiling"), Ok(Classification::Moderate));
    assert_eq!(summary.classification_of("High"), Ok(Classification::HighValue));
}

#[test]
fn test_stage_failures_are_distinct() {
    let settings = InsightSettings {
        top_n: -1,
        ..InsightSettings::default()
    };
    let aggregation: ReportError = sample_aggregator().run(&settings).unwrap_err().into();
    assert!(matches!(
        aggregation,
        ReportError::Aggregation(AggregationError::InvalidArgument(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    let write = write_report("x", &dir.path().join("no-such-dir").join("r.txt")).unwrap_err();
    assert!(matches!(write, ReportError::Write { .. }));
    assert_ne!(aggregation.exit_code(), write.exit_code());
}
