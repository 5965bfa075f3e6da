use crate::cart::{Cart, ProductDescriptor};
use crate::storage::CartStorage;

/// Result of [`CartStore::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has this quantity.
    Set(u32),
    /// The requested quantity was below 1, so the line was removed.
    Removed,
    /// No line item had that product id.
    NotInCart,
}

/// The authoritative cart for this session, written through to durable
/// storage after every mutation.
///
/// Mutations never fail. If a save fails the in-memory cart still reflects
/// the change, the failure is logged, and [`CartStore::persistence_healthy`]
/// reports `false` until a later save succeeds.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    persist_failed: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// Restore the cart from `storage`, or start empty.
    pub fn open(storage: S) -> Self {
        let cart = storage.load();
        tracing::debug!(
            lines = cart.len(),
            items = cart.total_item_count(),
            "cart restored"
        );
        Self {
            cart,
            storage,
            persist_failed: false,
        }
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// `false` when the most recent save failed.
    #[must_use]
    pub fn persistence_healthy(&self) -> bool {
        !self.persist_failed
    }

    /// Add `quantity` of `product` (default 1), merging into an existing line.
    ///
    /// Stock is not checked here; callers check availability first.
    /// Returns the line's quantity after the merge.
    pub fn add_item(&mut self, product: &ProductDescriptor, quantity: Option<i64>) -> u32 {
        let qty = self.cart.add(product, quantity);
        tracing::debug!(product_id = %product.id(), quantity = qty, "cart add");
        self.persist();
        qty
    }

    /// Remove the line for `product_id`. Returns `true` if one was present.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let removed = self.cart.remove(product_id);
        tracing::debug!(product_id, removed, "cart remove");
        self.persist();
        removed
    }

    /// Set a line's quantity. Quantities below 1 remove the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> QuantityUpdate {
        let outcome = match self.cart.set_quantity(product_id, quantity) {
            Some(0) => QuantityUpdate::Removed,
            Some(q) => QuantityUpdate::Set(q),
            None => QuantityUpdate::NotInCart,
        };
        tracing::debug!(product_id, quantity, ?outcome, "cart update quantity");
        self.persist();
        outcome
    }

    /// Empty the cart and persist the empty cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    fn persist(&mut self) {
        match self.storage.save(&self.cart) {
            Ok(()) => self.persist_failed = false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist cart; in-memory cart kept");
                self.persist_failed = true;
            }
        }
    }
}
