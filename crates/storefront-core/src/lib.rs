pub mod app_config;
pub mod catalog;
pub mod config;
pub mod orders;
pub mod session;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Product, Review, ReviewAuthor};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{
    filter_orders, sort_orders, Order, OrderCustomer, OrderItem, OrderSort, OrderStatus,
};
pub use session::{Role, Session, User};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised when parsing user-supplied domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid order status: {0}")]
    InvalidOrderStatus(String),

    #[error("invalid sort order '{0}'; expected one of date-desc, date-asc, total-desc, total-asc")]
    InvalidOrderSort(String),

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("invalid role '{0}'; expected user or admin")]
    InvalidRole(String),
}
