//! Server-owned orders and the client-side views over them.
//!
//! Once checkout succeeds an order is a read-only reference obtained from
//! the remote API. The only client logic here is searching and ordering a
//! fetched list for display.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(CoreError::InvalidOrderStatus(s.to_string())),
        }
    }
}

/// One line of a submitted order, frozen at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl OrderItem {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Customer details the admin order endpoints embed in each order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Populated only by endpoints that expand the owning user.
    #[serde(default, deserialize_with = "customer_or_id")]
    pub user: Option<OrderCustomer>,
}

/// Some endpoints return `user` as a bare id string instead of an object.
fn customer_or_id<'de, D>(deserializer: D) -> Result<Option<OrderCustomer>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Customer(OrderCustomer),
        Id(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Customer(c)) => Some(c),
        Some(Raw::Id(id)) => Some(OrderCustomer {
            id,
            name: String::new(),
            email: String::new(),
        }),
        None => None,
    })
}

impl Order {
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    #[default]
    DateDesc,
    DateAsc,
    TotalDesc,
    TotalAsc,
}

impl std::fmt::Display for OrderSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderSort::DateDesc => "date-desc",
            OrderSort::DateAsc => "date-asc",
            OrderSort::TotalDesc => "total-desc",
            OrderSort::TotalAsc => "total-asc",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(OrderSort::DateDesc),
            "date-asc" => Ok(OrderSort::DateAsc),
            "total-desc" => Ok(OrderSort::TotalDesc),
            "total-asc" => Ok(OrderSort::TotalAsc),
            other => Err(CoreError::InvalidOrderSort(other.to_string())),
        }
    }
}

/// Keep orders whose id or any item name contains `search`, ignoring case.
///
/// A blank search keeps every order.
#[must_use]
pub fn filter_orders<'a>(orders: &'a [Order], search: &str) -> Vec<&'a Order> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return orders.iter().collect();
    }
    orders
        .iter()
        .filter(|order| {
            order.id.to_lowercase().contains(&needle)
                || order
                    .items
                    .iter()
                    .any(|item| item.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort orders in place. Orders without a creation date sort last for both
/// date orderings.
pub fn sort_orders(orders: &mut [&Order], sort: OrderSort) {
    orders.sort_by(|a, b| match sort {
        OrderSort::DateDesc => cmp_dates(a.created_at, b.created_at, true),
        OrderSort::DateAsc => cmp_dates(a.created_at, b.created_at, false),
        OrderSort::TotalDesc => b.total.cmp(&a.total),
        OrderSort::TotalAsc => a.total.cmp(&b.total),
    });
}

fn cmp_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
