pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
pub mod orders;
mod retry;
pub mod types;
pub mod users;

pub use client::StorefrontClient;
pub use error::ApiError;
pub use types::{
    AdminStats, CreatedOrder, NewProduct, OrderSubmission, OrderSubmissionItem, ProfileUpdate,
    Registration, UserUpdate,
};
