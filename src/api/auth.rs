use async_trait::async_trait;

use super::client::ApiClient;
use super::models::{AuthStatus, LoginRequest, LoginResponse, RegisterRequest};
use super::AuthApi;
use crate::errors::ApiError;

/// Role assigned to self-registered accounts.
pub const DEFAULT_ROLE: &str = "user";

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, username: &str, password: &str, email: &str) -> Result<(), ApiError> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: DEFAULT_ROLE.to_string(),
            email: email.to_string(),
        };
        self.post_empty("auth/register", Some(&body)).await?;
        tracing::info!(username, "registered account");
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        // The backend may answer with just a message; the session lives in the cookie.
        let value = self.post_value("auth/login", &body).await?;
        let response = serde_json::from_value(value).unwrap_or_default();
        tracing::info!(username, "logged in");
        Ok(response)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty::<()>("auth/logout", None).await?;
        tracing::info!("logged out");
        Ok(())
    }

    async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.get_json("auth/status", &[]).await
    }
}
