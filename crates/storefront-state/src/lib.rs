//! Client-local state for the storefront: the shopping cart and the
//! authenticated session, both kept in durable storage on this device.
//!
//! [`CartStore`] is the only sanctioned way to change cart contents. Every
//! mutation updates the in-memory [`Cart`] and then writes the whole cart
//! through its [`CartStorage`] backend.

pub mod cart;
pub mod error;
pub mod session_store;
pub mod storage;
pub mod store;

pub use cart::{Cart, CartLineItem, ProductDescriptor};
pub use error::StateError;
pub use session_store::SessionStore;
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage, CART_FORMAT_VERSION};
pub use store::{CartStore, QuantityUpdate};
