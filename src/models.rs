//! Data models for order aggregation.
//!
//! This module contains the order record, the spend classification and
//! the insertion-ordered map used for every derived grouping.

use crate::error::{AggregationError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

/// Totals strictly above this are High-Value.
pub const HIGH_VALUE_THRESHOLD: f64 = 100.0;

/// Totals at or above this (and not above [`HIGH_VALUE_THRESHOLD`]) are Moderate.
pub const MODERATE_THRESHOLD: f64 = 50.0;

/// A single purchase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Name of the customer who placed the order.
    pub customer: String,
    /// Name of the product bought.
    pub product: String,
    /// Price paid, never negative.
    pub price: f64,
    /// Category the product was sold under.
    pub category: String,
}

impl Order {
    /// Creates a validated order.
    pub fn new(
        customer: impl Into<String>,
        product: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Result<Self> {
        let order = Self {
            customer: customer.into(),
            product: product.into(),
            price,
            category: category.into(),
        };
        order.validate()?;
        Ok(order)
    }

    /// Checks the record against the boundary rules.
    pub fn validate(&self) -> Result<()> {
        if self.customer.trim().is_empty() {
            return Err(AggregationError::InvalidArgument(
                "customer name must not be empty".to_string(),
            ));
        }
        if self.product.trim().is_empty() {
            return Err(AggregationError::InvalidArgument(format!(
                "product name must not be empty (customer {})",
                self.customer
            )));
        }
        if self.category.trim().is_empty() {
            return Err(AggregationError::InvalidArgument(format!(
                "category name must not be empty (product {})",
                self.product
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AggregationError::InvalidArgument(format!(
                "price must be a non-negative number, got {} for {}",
                self.price, self.product
            )));
        }
        Ok(())
    }

    /// The (product, price, category) triple kept per customer.
    pub fn line(&self) -> OrderLine {
        OrderLine {
            product: self.product.clone(),
            price: self.price,
            category: self.category.clone(),
        }
    }
}

/// One line of a customer's order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: String,
    pub price: f64,
    pub category: String,
}

/// Spend classification of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Total spend below 50
    #[serde(rename = "Low-Value")]
    LowValue,
    /// Total spend from 50 to 100 inclusive
    Moderate,
    /// Total spend above 100
    #[serde(rename = "High-Value")]
    HighValue,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::LowValue => write!(f, "Low-Value"),
            Classification::Moderate => write!(f, "Moderate"),
            Classification::HighValue => write!(f, "High-Value"),
        }
    }
}

/// A map that remembers the order keys were first inserted in.
///
/// Overwriting a key replaces its value in place; the key keeps its
/// original position. Equality and serialization follow insertion order.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one if the key existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> &mut V {
        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.index.insert(key.clone(), pos);
                self.entries.push((key, default()));
                pos
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }
}

impl<K, V> OrderedMap<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Customer name to their order lines, in input order.
pub type CustomerOrderGroup = OrderedMap<String, Vec<OrderLine>>;

/// Product name to category; last write wins.
pub type ProductCategoryIndex = OrderedMap<String, String>;

/// Customer name to total spend.
pub type CustomerSpending = OrderedMap<String, f64>;

/// Customer name to spend classification.
pub type CustomerClassification = OrderedMap<String, Classification>;

/// Category name to summed price.
pub type CategoryRevenue = OrderedMap<String, f64>;

/// Category name to the customers who bought in it.
pub type CustomersPerCategory = OrderedMap<String, BTreeSet<String>>;
