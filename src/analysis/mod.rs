//! Analysis modules.
//!
//! Aggregation of raw orders into customer and category insights.

pub mod aggregator;

pub use aggregator::*;
