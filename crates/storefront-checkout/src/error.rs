use std::time::Duration;

use storefront_api::ApiError;
use thiserror::Error;

/// Shown when the server gives no message of its own.
pub const FALLBACK_MESSAGE: &str = "Failed to place order. Please try again.";

/// Why a checkout attempt did not produce an order.
///
/// In every case the cart is unchanged.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    /// No usable bearer token. The caller should send the user to log in.
    #[error("not logged in")]
    NotAuthenticated,

    #[error("order submission timed out after {after:?}")]
    Timeout { after: Duration },

    /// The order endpoint answered with a non-2xx status.
    #[error("order rejected with HTTP {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("order submission failed: {0}")]
    Transport(String),

    #[error("malformed order response: {0}")]
    MalformedResponse(String),
}

impl CheckoutError {
    /// Text to show the user: the server's own message when it sent one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Your cart is empty.".to_string(),
            CheckoutError::NotAuthenticated => "Please log in to place an order.".to_string(),
            CheckoutError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            CheckoutError::NotAuthenticated | CheckoutError::Rejected { status: 401, .. }
        )
    }

    pub(crate) fn from_api(err: ApiError, timeout: Duration) -> Self {
        match err {
            ApiError::Status { status, message } => CheckoutError::Rejected { status, message },
            ApiError::Timeout => CheckoutError::Timeout { after: timeout },
            ApiError::Deserialize { .. } | ApiError::Malformed { .. } => {
                CheckoutError::MalformedResponse(err.to_string())
            }
            ApiError::Http(_) | ApiError::InvalidBaseUrl { .. } => {
                CheckoutError::Transport(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = CheckoutError::from_api(
            ApiError::Status {
                status: 400,
                message: Some("Product Lamp is out of stock".to_string()),
            },
            Duration::from_secs(20),
        );
        assert_eq!(err.user_message(), "Product Lamp is out of stock");
    }

    #[test]
    fn missing_server_message_uses_fallback() {
        let err = CheckoutError::from_api(
            ApiError::Status {
                status: 500,
                message: None,
            },
            Duration::from_secs(20),
        );
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
        let timeout = CheckoutError::Timeout {
            after: Duration::from_secs(20),
        };
        assert_eq!(timeout.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn api_errors_map_to_checkout_errors() {
        assert!(matches!(
            CheckoutError::from_api(ApiError::Timeout, Duration::from_secs(7)),
            CheckoutError::Timeout { after } if after == Duration::from_secs(7)
        ));
        assert!(matches!(
            CheckoutError::from_api(
                ApiError::Malformed {
                    context: "POST orders".to_string(),
                    reason: "order has no _id".to_string(),
                },
                Duration::from_secs(7)
            ),
            CheckoutError::MalformedResponse(_)
        ));
    }

    #[test]
    fn unauthorized_requires_login() {
        assert!(CheckoutError::NotAuthenticated.requires_login());
        assert!(CheckoutError::Rejected {
            status: 401,
            message: None
        }
        .requires_login());
        assert!(!CheckoutError::EmptyCart.requires_login());
    }
}
