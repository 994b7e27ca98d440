//! Order aggregation and customer insights.
//!
//! Every step here is a pure function over its arguments. [`Aggregator`]
//! chains them into a single pass and bundles the results in a
//! [`Summary`] that the report generator consumes.

use crate::error::{AggregationError, Result};
use crate::models::{
    CategoryRevenue, Classification, CustomerClassification, CustomerOrderGroup,
    CustomerSpending, CustomersPerCategory, Order, ProductCategoryIndex, HIGH_VALUE_THRESHOLD,
    MODERATE_THRESHOLD,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Group order lines by customer, keeping input order.
pub fn group_by_customer(orders: &[Order]) -> CustomerOrderGroup {
    let mut grouped = CustomerOrderGroup::new();

    for order in orders {
        grouped
            .get_or_insert_with(order.customer.clone(), Vec::new)
            .push(order.line());
    }

    grouped
}

/// Map each product to its category. A later order for the same product
/// overwrites the earlier category.
pub fn build_product_category_index(orders: &[Order]) -> ProductCategoryIndex {
    orders
        .iter()
        .map(|o| (o.product.clone(), o.category.clone()))
        .collect()
}

/// Distinct categories of the product index, in index order.
pub fn known_categories(index: &ProductCategoryIndex) -> Vec<String> {
    let mut seen = BTreeSet::new();
    index
        .values()
        .filter(|category| seen.insert(category.as_str()))
        .cloned()
        .collect()
}

/// Total spend per customer.
pub fn compute_spending(group: &CustomerOrderGroup) -> CustomerSpending {
    group
        .iter()
        .map(|(customer, lines)| (customer.clone(), lines.iter().map(|l| l.price).sum::<f64>()))
        .collect()
}

/// Classify a total spend.
pub fn classify(total: f64) -> Classification {
    if total > HIGH_VALUE_THRESHOLD {
        Classification::HighValue
    } else if total >= MODERATE_THRESHOLD {
        Classification::Moderate
    } else {
        Classification::LowValue
    }
}

/// Classify every customer in `spending`.
pub fn classify_customers(spending: &CustomerSpending) -> CustomerClassification {
    spending
        .iter()
        .map(|(customer, total)| (customer.clone(), classify(*total)))
        .collect()
}

/// Summed price per category, independent of customer.
pub fn compute_category_revenue(orders: &[Order]) -> CategoryRevenue {
    let mut revenue = CategoryRevenue::new();

    for order in orders {
        *revenue.get_or_insert_with(order.category.clone(), || 0.0) += order.price;
    }

    revenue
}

/// Distinct product names.
pub fn unique_products(orders: &[Order]) -> BTreeSet<String> {
    orders.iter().map(|o| o.product.clone()).collect()
}

/// Reject an empty category name.
pub fn require_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(AggregationError::InvalidArgument(
            "category name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Customers with at least one order in `category`.
pub fn customers_in_category(
    group: &CustomerOrderGroup,
    category: &str,
) -> Result<BTreeSet<String>> {
    require_category(category)?;

    Ok(group
        .iter()
        .filter(|(_, lines)| lines.iter().any(|l| l.category == category))
        .map(|(customer, _)| customer.clone())
        .collect())
}

/// [`customers_in_category`] for each of `categories`.
pub fn customers_per_category(
    group: &CustomerOrderGroup,
    categories: &[String],
) -> Result<CustomersPerCategory> {
    categories
        .iter()
        .map(|category| {
            let customers = customers_in_category(group, category)?;
            Ok::<_, AggregationError>((category.clone(), customers))
        })
        .collect()
}

/// Customers present in every category set.
///
/// An empty map yields an empty set rather than the universal set an
/// intersection over zero sets would imply.
pub fn multi_category_customers(per_category: &CustomersPerCategory) -> BTreeSet<String> {
    let mut sets = per_category.values();
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };

    sets.fold(first.clone(), |acc, set| acc.intersection(set).cloned().collect())
}

/// Customers who bought in both `cat_a` and `cat_b`.
pub fn category_pair_overlap(
    per_category: &CustomersPerCategory,
    cat_a: &str,
    cat_b: &str,
) -> Result<BTreeSet<String>> {
    require_category(cat_a)?;
    require_category(cat_b)?;

    let lookup = |category: &str| {
        per_category
            .get(category)
            .ok_or_else(|| AggregationError::KeyNotFound(format!("category '{}'", category)))
    };

    let a = lookup(cat_a)?;
    let b = lookup(cat_b)?;
    Ok(a.intersection(b).cloned().collect())
}

/// The `n` highest spenders, highest first. Ties keep their order in
/// `spending`.
pub fn top_spenders(spending: &CustomerSpending, n: i64) -> Result<Vec<(String, f64)>> {
    if n < 0 {
        return Err(AggregationError::InvalidArgument(format!(
            "top spender count must not be negative, got {}",
            n
        )));
    }

    let mut ranked: Vec<(String, f64)> = spending
        .iter()
        .map(|(customer, total)| (customer.clone(), *total))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(usize::try_from(n).unwrap_or(usize::MAX));

    Ok(ranked)
}

/// Revenue across all customers.
pub fn total_revenue(spending: &CustomerSpending) -> f64 {
    spending.values().sum()
}

/// Report-level choices for the insight section.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSettings {
    /// How many top spenders to list.
    pub top_n: i64,
    /// Category whose buyers are listed on their own.
    pub spotlight_category: String,
    /// Category pair for the overlap insight.
    pub overlap: [String; 2],
}

impl InsightSettings {
    /// Check the category names before any aggregation runs.
    pub fn validate(&self) -> Result<()> {
        require_category(&self.spotlight_category)?;
        for category in &self.overlap {
            require_category(category)?;
        }
        Ok(())
    }
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            top_n: 3,
            spotlight_category: "Electronics".to_string(),
            overlap: ["Electronics".to_string(), "Clothing".to_string()],
        }
    }
}

/// Buyers of a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInsight {
    pub category: String,
    pub customers: BTreeSet<String>,
}

/// Buyers common to a pair of categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapInsight {
    pub categories: [String; 2],
    pub customers: BTreeSet<String>,
}

/// Every derived aggregate of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub order_count: usize,
    pub total_customers: usize,
    pub unique_products: BTreeSet<String>,
    pub categories: Vec<String>,
    pub total_revenue: f64,
    pub spending: CustomerSpending,
    pub classification: CustomerClassification,
    pub category_revenue: CategoryRevenue,
    pub customers_per_category: CustomersPerCategory,
    pub top_spenders: Vec<(String, f64)>,
    pub spotlight: CategoryInsight,
    pub multi_category_customers: BTreeSet<String>,
    pub overlap: OverlapInsight,
}

impl Summary {
    /// Classification of a customer who placed orders.
    pub fn classification_of(&self, customer: &str) -> Result<Classification> {
        self.classification
            .get(customer)
            .copied()
            .ok_or_else(|| AggregationError::KeyNotFound(format!("customer '{}'", customer)))
    }
}

/// Single-pass aggregation over a fixed order list.
#[derive(Debug, Clone)]
pub struct Aggregator {
    orders: Vec<Order>,
    roster: Option<Vec<String>>,
}

impl Aggregator {
    /// Validate `orders` and build an aggregator over them.
    pub fn new(orders: Vec<Order>) -> Result<Self> {
        for order in &orders {
            order.validate()?;
        }

        Ok(Self {
            orders,
            roster: None,
        })
    }

    /// Use `roster` as the known customer list.
    pub fn with_roster(mut self, roster: Vec<String>) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Run every aggregation step. Any failure aborts the whole run.
    pub fn run(&self, settings: &InsightSettings) -> Result<Summary> {
        settings.validate()?;

        let group = group_by_customer(&self.orders);
        debug!(
            "Grouped {} orders across {} customers",
            self.orders.len(),
            group.len()
        );

        let index = build_product_category_index(&self.orders);
        let categories = known_categories(&index);
        debug!("Indexed {} products in {} categories", index.len(), categories.len());

        let spending = compute_spending(&group);
        let classification = classify_customers(&spending);
        let category_revenue = compute_category_revenue(&self.orders);

        let per_category = customers_per_category(&group, &categories)?;
        let spotlight = customers_in_category(&group, &settings.spotlight_category)?;
        let multi = multi_category_customers(&per_category);
        let [left, right] = &settings.overlap;
        let overlap = category_pair_overlap(&per_category, left, right)?;
        let top = top_spenders(&spending, settings.top_n)?;

        let total_customers = match &self.roster {
            Some(roster) => roster.len(),
            None => group.len(),
        };

        Ok(Summary {
            order_count: self.orders.len(),
            total_customers,
            unique_products: unique_products(&self.orders),
            categories,
            total_revenue: total_revenue(&spending),
            spotlight: CategoryInsight {
                category: settings.spotlight_category.clone(),
                customers: spotlight,
            },
            overlap: OverlapInsight {
                categories: settings.overlap.clone(),
                customers: overlap,
            },
            multi_category_customers: multi,
            top_spenders: top,
            customers_per_category: per_category,
            spending,
            classification,
            category_revenue,
        })
    }
}
