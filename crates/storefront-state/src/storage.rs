//! Durable storage backends for the cart.
//!
//! The whole cart is written as one JSON document on every save:
//!
//! ```json
//! { "version": 1, "items": [ { "_id": "...", "name": "...", "price": 10, "image": "...", "quantity": 2 } ] }
//! ```
//!
//! Loading also accepts the older unversioned form, a bare array of items.
//! Loading never fails: an unreadable document is treated as an empty cart,
//! and an unreadable or out-of-range row is dropped while the rest load.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLineItem};
use crate::error::StateError;

/// Current on-disk cart format.
pub const CART_FORMAT_VERSION: u32 = 1;

/// Where the cart lives between sessions.
pub trait CartStorage {
    /// Read the stored cart. Missing or corrupt data yields an empty cart.
    fn load(&self) -> Cart;

    /// Overwrite the stored cart with `cart`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] if the backend cannot persist the cart.
    fn save(&self, cart: &Cart) -> Result<(), StateError>;
}

#[derive(Serialize)]
struct PersistedCartRef<'a> {
    version: u32,
    items: &'a [CartLineItem],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedCart {
    Versioned {
        version: u32,
        items: Vec<serde_json::Value>,
    },
    Legacy(Vec<serde_json::Value>),
}

/// One stored row as written, before the cart invariants are applied.
///
/// `quantity` is signed so a single out-of-range row can be dropped without
/// failing the whole document.
#[derive(Deserialize)]
struct StoredRow {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: rust_decimal::Decimal,
    #[serde(default)]
    image: String,
    #[serde(default)]
    category: Option<String>,
    quantity: i64,
}

impl StoredRow {
    fn into_line(self) -> CartLineItem {
        // Non-positive quantities become 0, which `Cart::from_items` drops.
        let quantity = u32::try_from(self.quantity.max(0)).unwrap_or(u32::MAX);
        CartLineItem {
            id: self.id,
            name: self.name,
            unit_price: self.price,
            image_ref: self.image,
            category: self.category,
            quantity,
        }
    }
}

fn rows_to_cart(rows: Vec<serde_json::Value>) -> Cart {
    let lines = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<StoredRow>(row) {
            Ok(row) => Some(row.into_line()),
            Err(e) => {
                tracing::warn!(error = %e, "dropping unreadable stored cart row");
                None
            }
        })
        .collect();
    Cart::from_items(lines)
}

/// Serialize `cart` in the current storage format.
///
/// # Errors
///
/// Returns [`StateError::Serialize`] if encoding fails.
pub fn encode_cart(cart: &Cart) -> Result<String, StateError> {
    let doc = PersistedCartRef {
        version: CART_FORMAT_VERSION,
        items: cart.items(),
    };
    Ok(serde_json::to_string(&doc)?)
}

/// Parse stored cart text, falling back to an empty cart on any problem.
#[must_use]
pub fn decode_cart(text: &str) -> Cart {
    if text.trim().is_empty() {
        return Cart::new();
    }
    match serde_json::from_str::<PersistedCart>(text) {
        Ok(PersistedCart::Versioned { version, items }) if version == CART_FORMAT_VERSION => {
            rows_to_cart(items)
        }
        Ok(PersistedCart::Versioned { version, .. }) => {
            tracing::warn!(version, "stored cart has unsupported format version; starting empty");
            Cart::new()
        }
        Ok(PersistedCart::Legacy(items)) => {
            tracing::debug!(rows = items.len(), "loaded unversioned stored cart");
            rows_to_cart(items)
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored cart is unreadable; starting empty");
            Cart::new()
        }
    }
}

/// Write `contents` to a sibling temp file and rename it over `path`, so a
/// reader never observes a half-written file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StateError> {
    let io_err = |source| StateError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}

/// Read a state file, mapping "not found" to `None`. Other read errors are
/// logged and also yield `None`.
pub(crate) fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read state file");
            None
        }
    }
}

/// Cart storage in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Cart {
        match read_optional(&self.path) {
            Some(text) => decode_cart(&text),
            None => {
                tracing::debug!(path = %self.path.display(), "no stored cart; starting empty");
                Cart::new()
            }
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), StateError> {
        let text = encode_cart(cart)?;
        write_atomic(&self.path, &text)
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    text: Option<String>,
    fail_saves: bool,
    saves: usize,
}

/// In-memory cart storage. Clones share the same slot, so a test can keep a
/// handle while a [`crate::CartStore`] owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with raw stored text.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().text = Some(text.into());
        storage
    }

    /// The raw text of the last successful save.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().text.clone()
    }

    /// Make subsequent saves fail with [`StateError::Unavailable`].
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Cart {
        self.lock().text.as_deref().map_or_else(Cart::new, decode_cart)
    }

    fn save(&self, cart: &Cart) -> Result<(), StateError> {
        let text = encode_cart(cart)?;
        let mut slot = self.lock();
        if slot.fail_saves {
            return Err(StateError::Unavailable("memory storage set to fail".to_string()));
        }
        slot.text = Some(text);
        slot.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn decode_empty_or_garbage_is_empty_cart() {
        assert!(decode_cart("").is_empty());
        assert!(decode_cart("{not json").is_empty());
        assert!(decode_cart("42").is_empty());
        assert!(decode_cart(r#"{"version":1,"items":"nope"}"#).is_empty());
    }

    #[test]
    fn decode_legacy_bare_array() {
        let text = r#"[{"_id":"A","name":"Shoe","price":10,"quantity":2,"image":"a.png","category":"Shoes"}]"#;
        let cart = decode_cart(text);
        assert_eq!(cart.len(), 1);
        let line = cart.get("A").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Decimal::from(10));
        assert_eq!(line.category.as_deref(), Some("Shoes"));
    }

    #[test]
    fn decode_unknown_version_is_empty_cart() {
        let text = r#"{"version":99,"items":[{"_id":"A","name":"Shoe","price":10,"quantity":2}]}"#;
        assert!(decode_cart(text).is_empty());
    }

    #[test]
    fn decode_negative_quantity_drops_only_that_row() {
        let text = r#"[
            {"_id":"A","name":"Shoe","price":10,"quantity":2,"image":"a.png"},
            {"_id":"B","name":"Hat","price":5,"quantity":-4,"image":"b.png"}
        ]"#;
        let cart = decode_cart(text);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("A").map(|l| l.quantity), Some(2));
        assert!(cart.get("B").is_none());
    }

    #[test]
    fn decode_skips_unreadable_rows_in_versioned_document() {
        let text = r#"{"version":1,"items":[
            {"_id":"A","name":"Shoe","price":10,"quantity":1},
            {"_id":"B","quantity":"lots"},
            {"_id":"C","name":"Sock","price":2.5,"quantity":0},
            {"_id":"D","name":"Belt","price":8,"quantity":3}
        ]}"#;
        let cart = decode_cart(text);
        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["A", "D"]);
        assert_eq!(cart.total_item_count(), 4);
    }

    #[test]
    fn decode_saturates_oversized_quantity() {
        let text = r#"[{"_id":"A","name":"Shoe","price":1,"quantity":99999999999}]"#;
        assert_eq!(decode_cart(text).get("A").map(|l| l.quantity), Some(u32::MAX));
    }

    #[test]
    fn encode_writes_version_tag() {
        let text = encode_cart(&Cart::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["items"], serde_json::json!([]));
    }

    #[test]
    fn memory_storage_failure_switch() {
        let storage = MemoryStorage::new();
        storage.set_fail_saves(true);
        assert!(matches!(
            storage.save(&Cart::new()),
            Err(StateError::Unavailable(_))
        ));
        assert_eq!(storage.save_count(), 0);
        storage.set_fail_saves(false);
        storage.save(&Cart::new()).unwrap();
        assert_eq!(storage.save_count(), 1);
    }
}
