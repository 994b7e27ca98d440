//! Order Insights: customer order aggregation and spend classification.
//!
//! The library exposes the aggregation pipeline and the report writer
//! that consumes its [`Summary`]. The `order-insights` binary wires them
//! to a CLI and configuration file.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod report;

pub use analysis::{
    build_product_category_index, category_pair_overlap, classify, classify_customers,
    compute_category_revenue, compute_spending, customers_in_category, customers_per_category,
    group_by_customer, known_categories, multi_category_customers, require_category,
    top_spenders, total_revenue, unique_products, Aggregator, InsightSettings, Summary,
};
pub use error::{AggregationError, ReportError};
pub use models::{Classification, Order, OrderLine, OrderedMap};
