//! HTTP gateway for JSON APIs with bearer-token injection, a bounded timeout, and
//! centralized `401` handling. Every backend call goes through here so header setup
//! and error normalization are never duplicated. Failed calls are surfaced
//! immediately; there are no retries.

use super::{config::AppConfig, errors::AppError};
use crate::{
    APP_USER_AGENT,
    features::auth::{state::SessionStore, token::AuthToken},
    routes::{Navigator, paths},
};
use reqwest::{Client, Method, Response, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, to_string};
use std::sync::Arc;
use tracing::{Instrument, debug, info_span, warn};
use ulid::Ulid;
use url::Url;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;
/// Header carrying a per-request id for log correlation with the backend.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Single choke point for backend requests.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    /// # Errors
    /// Returns `AppError::Config` if the base URL is not an absolute http(s) URL or
    /// the HTTP client cannot be built.
    pub fn new(
        config: &AppConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let base_url = validate_base_url(&config.api_base_url)?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            session,
            navigator,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.send(Method::GET, path, None).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let payload = encode(body)?;
        let response = self.send(Method::POST, path, Some(payload)).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and ignores any response body.
    pub async fn post_json_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let payload = encode(body)?;
        let response = self.send(Method::POST, path, Some(payload)).await?;
        handle_empty_response(response).await
    }

    /// Sends a request with the session token attached. A `401` is handled here and
    /// returned as `AppError::Unauthorized`; other statuses are left to the caller.
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<String>,
    ) -> Result<Response, AppError> {
        let url = build_url_with_base(&self.base_url, path);
        let token = self.session.token();
        let request_id = Ulid::new().to_string();

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = &token {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(payload) = payload {
            builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let span = info_span!(
            "gateway.request",
            http.method = %method,
            url = %url,
            request_id = %request_id,
            authenticated = token.is_some()
        );
        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let message = error_message(response, "Authentication required.").await;
            self.handle_unauthorized(token.as_ref(), &message);
            return Err(AppError::Unauthorized(message));
        }

        Ok(response)
    }

    /// Expires the session that issued the rejected request and sends the user to
    /// login. Concurrent `401`s for the same token only act once.
    fn handle_unauthorized(&self, token: Option<&AuthToken>, message: &str) {
        let Some(token) = token else {
            debug!("401 on an anonymous request");
            return;
        };

        if !self.session.expire(token, message) {
            debug!("401 for a session that is already cleared");
            return;
        }

        let current = self.navigator.current_path();
        if paths::is_auth_entry(&current) {
            debug!("already on {current}, not redirecting");
        } else {
            warn!("session rejected by the API, redirecting to {}", paths::LOGIN);
            self.navigator.navigate(paths::LOGIN);
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<String, AppError> {
    to_string(body).map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))
}

/// Checks that the base URL is absolute http(s) and returns it without a trailing slash.
fn validate_base_url(base_url: &str) -> Result<String, AppError> {
    let parsed = Url::parse(base_url.trim())
        .map_err(|err| AppError::Config(format!("Invalid API base URL {base_url}: {err}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(base_url.trim().trim_end_matches('/').to_string()),
        scheme => Err(AppError::Config(format!(
            "Invalid API base URL {base_url}: unsupported scheme {scheme}"
        ))),
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Serialization(format!("Failed to build request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with normalized messages.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles responses whose body is not needed.
async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    AppError::Http {
        status,
        message: error_message(response, "Request failed.").await,
    }
}

async fn error_message(response: Response, fallback: &str) -> String {
    let body = response.text().await.unwrap_or_default();
    extract_message(&body).unwrap_or_else(|| fallback.to_string())
}

/// Picks the `message` field, then the `error` field, then the raw body.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        let field = ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|message| !message.is_empty());
        if let Some(message) = field {
            return Some(sanitize(message));
        }
    }

    Some(sanitize(trimmed))
}

/// Truncates messages for display.
fn sanitize(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}
