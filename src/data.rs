//! Built-in order data.

use crate::error::Result;
use crate::models::Order;

/// Known customers, including any that have not ordered.
pub const CUSTOMER_ROSTER: &[&str] = &["Alice", "Bob", "Charlie", "David", "Eva", "Frank"];

/// (customer, product, price, category)
pub const SAMPLE_ORDERS: &[(&str, &str, f64, &str)] = &[
    ("Alice", "Laptop", 800.0, "Electronics"),
    ("Alice", "Mouse", 20.0, "Electronics"),
    ("Bob", "T-Shirt", 25.0, "Clothing"),
    ("Bob", "Shoes", 60.0, "Clothing"),
    ("Charlie", "Vacuum Cleaner", 120.0, "Home Essentials"),
    ("Charlie", "T-Shirt", 25.0, "Clothing"),
    ("David", "Smartphone", 600.0, "Electronics"),
    ("Eva", "Blender", 45.0, "Home Essentials"),
    ("Eva", "Shoes", 60.0, "Clothing"),
    ("Frank", "Laptop", 800.0, "Electronics"),
    ("Frank", "Microwave", 90.0, "Home Essentials"),
];

/// Build validated orders from the sample table.
pub fn sample_orders() -> Result<Vec<Order>> {
    SAMPLE_ORDERS
        .iter()
        .map(|&(customer, product, price, category)| Order::new(customer, product, price, category))
        .collect()
}

/// The customer roster as owned names.
pub fn customer_roster() -> Vec<String> {
    CUSTOMER_ROSTER.iter().map(|name| name.to_string()).collect()
}
