use reqwest::Method;
use storefront_core::{Order, OrderStatus};

use crate::client::StorefrontClient;
use crate::error::ApiError;
use crate::types::{
    CreatedOrder, CreatedOrderEnvelope, OrderEnvelope, OrderSubmission, OrdersResponse,
    UpdateStatusRequest,
};

impl StorefrontClient {
    /// Submits an order exactly once.
    ///
    /// The submission's `request_id` is sent as the `Idempotency-Key` header.
    /// No retry is attempted on any failure.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] when the server rejects the order.
    /// - [`ApiError::Timeout`] / [`ApiError::Http`] on transport failure.
    /// - [`ApiError::Deserialize`] or [`ApiError::Malformed`] when a 2xx body
    ///   does not carry an order identifier.
    pub async fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> Result<CreatedOrder, ApiError> {
        let url = self.endpoint(&["orders"]);
        tracing::info!(
            request_id = %submission.request_id,
            items = submission.items.len(),
            total = %submission.total,
            "submitting order"
        );

        let envelope: CreatedOrderEnvelope = self
            .send_json(Method::POST, &url, Some(token), submission, Some(submission.request_id))
            .await?;

        let malformed = |reason: &str| ApiError::Malformed {
            context: "POST orders".to_string(),
            reason: reason.to_string(),
        };
        let body = envelope
            .order
            .ok_or_else(|| malformed("response has no order object"))?;
        let id = body
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed("order has no _id"))?;

        Ok(CreatedOrder {
            id,
            status: body.status,
            total: body.total,
        })
    }

    /// Orders placed by the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn list_my_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["orders", "user"]);
        let response: OrdersResponse = self.get_json(&url, Some(token)).await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 404 for an unknown order, or another
    /// [`ApiError`] on failure.
    pub async fn get_order(&self, token: &str, order_id: &str) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", order_id]);
        let response: OrderEnvelope = self.get_json(&url, Some(token)).await?;
        Ok(response.order)
    }

    /// Every order in the store. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] (401/403) for non-admin tokens, or another
    /// [`ApiError`] on failure.
    pub async fn list_all_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["orders"]);
        let response: OrdersResponse = self.get_json(&url, Some(token)).await?;
        Ok(response.into_vec())
    }

    /// Moves an order to a new status. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the server refuses the change, or
    /// another [`ApiError`] on failure.
    pub async fn update_order_status(
        &self,
        token: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["orders", order_id, "status"]);
        let _: serde_json::Value = self
            .send_json(Method::PUT, &url, Some(token), &UpdateStatusRequest { status }, None)
            .await?;
        tracing::info!(order_id, %status, "order status updated");
        Ok(())
    }
}
