//! Turns the local cart into a server-confirmed order.
//!
//! The cart is cleared only after the order endpoint answers with an order
//! id. Every other outcome leaves it exactly as it was.

pub mod error;
pub mod gateway;
pub mod orchestrator;

pub use error::{CheckoutError, FALLBACK_MESSAGE};
pub use gateway::OrderGateway;
pub use orchestrator::{build_submission, CheckoutConfirmation, CheckoutOrchestrator, CheckoutPhase};
