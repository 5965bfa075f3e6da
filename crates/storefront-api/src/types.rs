//! Request and response shapes for the storefront REST API.
//!
//! Several endpoints answer either with a bare value or with the value
//! wrapped in a named field (`{ "products": [...] }`); the untagged enums
//! below accept both.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::{Order, OrderStatus, Product, Review, Role, User};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// auth
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// A new account to create with `POST auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Fields to change with `PUT auth/update-profile`. `None` leaves a field as
/// it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserResponse {
    Wrapped { user: User },
    Bare(User),
}

impl UserResponse {
    pub fn into_inner(self) -> User {
        match self {
            UserResponse::Wrapped { user } | UserResponse::Bare(user) => user,
        }
    }
}

// ---------------------------------------------------------------------------
// user management
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UsersResponse {
    Wrapped { users: Vec<User> },
    List(Vec<User>),
}

impl UsersResponse {
    pub fn into_vec(self) -> Vec<User> {
        match self {
            UsersResponse::Wrapped { users } | UsersResponse::List(users) => users,
        }
    }
}

/// Body of `PUT users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Store-wide counters from `GET admin/stats`. Missing counters read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

// ---------------------------------------------------------------------------
// orders
// ---------------------------------------------------------------------------

/// One line of an order-creation request, copied from a cart line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSubmissionItem {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

/// Body of `POST orders`: a frozen snapshot of the cart plus its total.
///
/// `request_id` is not part of the body; it travels as the
/// `Idempotency-Key` header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSubmission {
    #[serde(skip)]
    pub request_id: Uuid,
    pub items: Vec<OrderSubmissionItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// What the client keeps from a successful order creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub id: String,
    pub status: Option<OrderStatus>,
    /// The server's total, when it echoes one.
    pub total: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedOrderEnvelope {
    #[serde(default)]
    pub order: Option<CreatedOrderBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedOrderBody {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: Order,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrdersResponse {
    Wrapped { orders: Vec<Order> },
    List(Vec<Order>),
}

impl OrdersResponse {
    pub fn into_vec(self) -> Vec<Order> {
        match self {
            OrdersResponse::Wrapped { orders } | OrdersResponse::List(orders) => orders,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductsResponse {
    Wrapped { products: Vec<Product> },
    List(Vec<Product>),
}

impl ProductsResponse {
    pub fn into_vec(self) -> Vec<Product> {
        match self {
            ProductsResponse::Wrapped { products } | ProductsResponse::List(products) => products,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductResponse {
    Wrapped { product: Product },
    Bare(Product),
}

impl ProductResponse {
    pub fn into_inner(self) -> Product {
        match self {
            ProductResponse::Wrapped { product } | ProductResponse::Bare(product) => product,
        }
    }
}

/// Body of `POST products`. `image` is a URL or path the server stores as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    pub image: String,
}

// ---------------------------------------------------------------------------
// reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewsResponse {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewResponse {
    pub review: Review,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateReviewRequest<'a> {
    #[serde(rename = "productId")]
    pub product_id: &'a str,
    pub rating: u8,
    pub comment: &'a str,
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

/// Error bodies look like `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
