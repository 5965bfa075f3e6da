use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A catalog product as served by the remote products endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "inStock", default)]
    pub in_stock: bool,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: ReviewAuthor,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Check a user-entered star rating before it is sent to the server.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRating`] unless `rating` is in `1..=5`.
    pub fn validate_rating(rating: i64) -> Result<u8, CoreError> {
        match u8::try_from(rating) {
            Ok(r @ 1..=5) => Ok(r),
            _ => Err(CoreError::InvalidRating(rating)),
        }
    }
}

/// Average star rating, or `None` when there are no reviews.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg = f64::from(sum) / reviews.len() as f64;
    Some(avg)
}
