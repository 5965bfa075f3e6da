use std::future::Future;

use storefront_api::{ApiError, CreatedOrder, OrderSubmission, StorefrontClient};

/// Something that can create an order on the server.
pub trait OrderGateway {
    /// Submit `submission` once, authenticated with `token`.
    fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> impl Future<Output = Result<CreatedOrder, ApiError>> + Send;
}

impl OrderGateway for StorefrontClient {
    fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> impl Future<Output = Result<CreatedOrder, ApiError>> + Send {
        StorefrontClient::create_order(self, token, submission)
    }
}
