//! Admin-only account management and store statistics.

use reqwest::Method;
use storefront_core::User;

use crate::client::StorefrontClient;
use crate::error::ApiError;
use crate::types::{AdminStats, UserUpdate, UsersResponse};

impl StorefrontClient {
    /// Every registered account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 403 for non-admin tokens, or
    /// another [`ApiError`] on failure.
    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["users"]);
        let response: UsersResponse = self.get_json(&url, Some(token)).await?;
        Ok(response.into_vec())
    }

    /// Renames an account or changes its role.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub async fn update_user(
        &self,
        token: &str,
        user_id: &str,
        update: &UserUpdate,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", user_id]);
        let _: serde_json::Value = self
            .send_json(Method::PUT, &url, Some(token), update, None)
            .await?;
        tracing::info!(user_id, "user updated");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 404 when the account does not
    /// exist, or another [`ApiError`] on failure.
    pub async fn delete_user(&self, token: &str, user_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", user_id]);
        self.delete(&url, token).await?;
        tracing::info!(user_id, "user deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn admin_stats(&self, token: &str) -> Result<AdminStats, ApiError> {
        let url = self.endpoint(&["admin", "stats"]);
        self.get_json(&url, Some(token)).await
    }
}
