use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::Product;

use crate::error::StateError;

/// What the catalog hands the cart when the user adds a product.
///
/// Construction validates the id and price, so every line item built from a
/// descriptor has a non-empty product id and a strictly positive unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDescriptor {
    id: String,
    name: String,
    unit_price: Decimal,
    image_ref: String,
    category: Option<String>,
}

impl ProductDescriptor {
    /// # Errors
    ///
    /// Returns [`StateError::InvalidProduct`] if `id` is blank or
    /// `unit_price` is not greater than zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        image_ref: impl Into<String>,
        category: Option<String>,
    ) -> Result<Self, StateError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StateError::InvalidProduct(
                "product id must be non-empty".to_string(),
            ));
        }
        if unit_price <= Decimal::ZERO {
            return Err(StateError::InvalidProduct(format!(
                "product '{id}' has non-positive price {unit_price}"
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
            category,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl TryFrom<&Product> for ProductDescriptor {
    type Error = StateError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        Self::new(
            product.id.clone(),
            product.name.clone(),
            product.price,
            product.image.clone(),
            product.category.clone(),
        )
    }
}

/// One product-and-quantity pair in the cart.
///
/// Serialized field names match the storefront's stored cart records
/// (`_id`, `price`, `image`) so older saved carts keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "image", default)]
    pub image_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub quantity: u32,
}

impl CartLineItem {
    fn from_descriptor(product: &ProductDescriptor, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image_ref: product.image_ref.clone(),
            category: product.category.clone(),
            quantity,
        }
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The set of line items the user intends to buy, at most one per product id.
///
/// Items keep their insertion order for display. The mutating methods are
/// crate-private: callers go through [`crate::CartStore`], which persists
/// after every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored rows, restoring the cart invariants.
    ///
    /// Rows with a blank id, zero quantity or non-positive price are dropped.
    /// Rows repeating an id are merged into the first occurrence.
    #[must_use]
    pub fn from_items(rows: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for row in rows {
            if row.id.trim().is_empty() || row.quantity == 0 || row.unit_price <= Decimal::ZERO {
                tracing::warn!(product_id = %row.id, "dropping invalid stored cart row");
                continue;
            }
            match cart.position(&row.id) {
                Some(idx) => {
                    let existing = &mut cart.items[idx];
                    existing.quantity = existing.quantity.saturating_add(row.quantity);
                }
                None => cart.items.push(row),
            }
        }
        cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all line items.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` across all line items.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == product_id)
    }

    /// Merge `quantity` of `product` into the cart and return the line's new quantity.
    pub(crate) fn add(&mut self, product: &ProductDescriptor, quantity: Option<i64>) -> u32 {
        let qty = normalize_add_quantity(quantity);
        match self.position(&product.id) {
            Some(idx) => {
                let line = &mut self.items[idx];
                line.quantity = line.quantity.saturating_add(qty);
                line.quantity
            }
            None => {
                self.items.push(CartLineItem::from_descriptor(product, qty));
                qty
            }
        }
    }

    /// Returns `true` if a line item was removed.
    pub(crate) fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != product_id);
        self.items.len() != before
    }

    /// Set a line's quantity directly; anything below 1 removes the line.
    ///
    /// Returns `None` when no line has `product_id`.
    pub(crate) fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Option<u32> {
        let idx = self.position(product_id)?;
        if quantity < 1 {
            self.items.remove(idx);
            return Some(0);
        }
        let qty = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.items[idx].quantity = qty;
        Some(qty)
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

/// Missing and non-positive quantities count as one; huge ones saturate.
fn normalize_add_quantity(quantity: Option<i64>) -> u32 {
    match quantity {
        Some(q) if q >= 1 => u32::try_from(q).unwrap_or(u32::MAX),
        _ => 1,
    }
}
