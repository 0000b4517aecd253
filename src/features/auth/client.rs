//! Client wrappers for the auth endpoints. These helpers centralize endpoint paths
//! and payload shapes so the session manager never builds requests by hand. Request
//! payloads carry passwords and must never be logged.

use crate::{
    app_lib::{AppError, Endpoints, Gateway},
    features::auth::types::{
        AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
    },
};

#[derive(Clone)]
pub struct AuthClient {
    gateway: Gateway,
    endpoints: Endpoints,
}

impl AuthClient {
    #[must_use]
    pub fn new(gateway: Gateway, endpoints: Endpoints) -> Self {
        Self { gateway, endpoints }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Exchanges credentials for a token (and usually the user record).
    pub async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, AppError> {
        self.gateway.post_json(&self.endpoints.login, request).await
    }

    /// Creates an account; any response body is ignored.
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<(), AppError> {
        self.gateway
            .post_json_empty(&self.endpoints.register, request)
            .await
    }

    /// Creates an account on backends that sign the new user in immediately.
    pub async fn register_and_sign_in(
        &self,
        request: &RegisterRequest<'_>,
    ) -> Result<AuthResponse, AppError> {
        self.gateway.post_json(&self.endpoints.register, request).await
    }

    /// Fetches the user bound to the current session token.
    pub async fn fetch_me(&self) -> Result<User, AppError> {
        self.gateway.get_json(&self.endpoints.me).await
    }

    /// Requests a password reset link without revealing whether the account exists.
    pub async fn reset_password(&self, request: &ResetPasswordRequest<'_>) -> Result<(), AppError> {
        self.gateway
            .post_json_empty(&self.endpoints.reset_password, request)
            .await
    }
}
