use reqwest::Method;
use storefront_core::{Session, User};

use crate::client::StorefrontClient;
use crate::error::ApiError;
use crate::types::{LoginRequest, ProfileUpdate, Registration, UserResponse};

impl StorefrontClient {
    /// Exchanges credentials for a bearer token and the user profile.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] when the server rejects the credentials; its
    ///   message (e.g. "Invalid credentials") is preserved.
    /// - [`ApiError::Deserialize`] if the body is not `{ token, user }`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let session: Session = self
            .send_json(Method::POST, &url, None, &LoginRequest { email, password }, None)
            .await?;
        tracing::info!(user = %session.user.email, role = %session.user.role, "logged in");
        Ok(session)
    }

    /// Creates an account. The server does not log the new user in; call
    /// [`StorefrontClient::login`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the server refuses the account (for
    /// instance an email already in use), or another [`ApiError`] on failure.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "register"]);
        let _: serde_json::Value = self
            .send_json(Method::POST, &url, None, registration, None)
            .await?;
        tracing::info!(user = %registration.email, role = %registration.role, "registered");
        Ok(())
    }

    /// The profile of the user `token` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 401 when the token is no
    /// longer accepted, or another [`ApiError`] on failure.
    pub async fn get_profile(&self, token: &str) -> Result<User, ApiError> {
        let url = self.endpoint(&["auth", "profile"]);
        let response: UserResponse = self.get_json(&url, Some(token)).await?;
        Ok(response.into_inner())
    }

    /// Changes the caller's name and/or email and returns the stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let url = self.endpoint(&["auth", "update-profile"]);
        let response: UserResponse = self
            .send_json(Method::PUT, &url, Some(token), update, None)
            .await?;
        Ok(response.into_inner())
    }
}
