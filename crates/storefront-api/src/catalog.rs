use reqwest::Method;
use storefront_core::{Product, Review};

use crate::client::StorefrontClient;
use crate::error::ApiError;
use crate::types::{
    CreateReviewRequest, NewProduct, ProductResponse, ProductsResponse, ReviewResponse,
    ReviewsResponse,
};

impl StorefrontClient {
    /// Lists the catalog, optionally restricted to one category.
    ///
    /// `None`, a blank string, or `"all"` mean no filter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let mut url = self.endpoint(&["products"]);
        if let Some(category) = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        {
            url.query_pairs_mut().append_pair("category", category);
        }
        let response: ProductsResponse = self.get_json(&url, None).await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 404 when the product does not
    /// exist, or another [`ApiError`] on failure.
    pub async fn get_product(&self, product_id: &str) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", product_id]);
        let response: ProductResponse = self.get_json(&url, None).await?;
        Ok(response.into_inner())
    }

    /// Adds a product to the catalog (admin accounts only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the server refuses the product, or
    /// another [`ApiError`] on failure.
    pub async fn create_product(
        &self,
        token: &str,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products"]);
        let response: ProductResponse = self
            .send_json(Method::POST, &url, Some(token), product, None)
            .await?;
        let created = response.into_inner();
        tracing::info!(product_id = %created.id, "product created");
        Ok(created)
    }

    /// Removes a product from the catalog (admin accounts only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 404 when the product does not
    /// exist, or another [`ApiError`] on failure.
    pub async fn delete_product(&self, token: &str, product_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", product_id]);
        self.delete(&url, token).await?;
        tracing::info!(product_id, "product deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn list_reviews(&self, product_id: &str) -> Result<Vec<Review>, ApiError> {
        let url = self.endpoint(&["reviews", "product", product_id]);
        let response: ReviewsResponse = self.get_json(&url, None).await?;
        Ok(response.reviews)
    }

    /// Posts a review as the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the server refuses the review (for
    /// instance a duplicate), or another [`ApiError`] on failure.
    pub async fn create_review(
        &self,
        token: &str,
        product_id: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint(&["reviews"]);
        let body = CreateReviewRequest {
            product_id,
            rating,
            comment,
        };
        let response: ReviewResponse = self
            .send_json(Method::POST, &url, Some(token), &body, None)
            .await?;
        Ok(response.review)
    }
}
