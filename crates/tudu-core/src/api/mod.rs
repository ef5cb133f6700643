//! HTTP client for the todo API.
//!
//! Covers the two auth endpoints (`/token/`, `/register/`) and the todo
//! collection. Authorization headers are rebuilt from the current access
//! token on every request, never cached. Failures map onto [`ApiError`]
//! kinds so callers branch on category instead of message text.

pub mod error;
pub mod types;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::Config;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use types::{Todo, TokenPair};

/// Default API base URL for local development servers.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV_VAR: &str = "TUDU_API_URL";

/// Minimum password length enforced before a register request is sent.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Validation message for passwords below [`PASSWORD_MIN_CHARS`].
pub const PASSWORD_TOO_SHORT_ERROR: &str = "Password must be at least 8 characters long";

const LOGIN_FALLBACK_ERROR: &str = "Invalid credentials";
const REGISTER_FALLBACK_ERROR: &str = "Registration failed";
const FETCH_TODOS_ERROR: &str = "Failed to fetch todos";
const ADD_TODO_ERROR: &str = "Failed to add todo";
const DELETE_TODO_ERROR: &str = "Failed to delete todo";

// ============================================================================
// Base URL resolution
// ============================================================================

/// Resolves the API base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    // Try env var first
    if let Ok(env_url) = std::env::var(BASE_URL_ENV_VAR) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    // Try config value
    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    // Default
    Ok(DEFAULT_BASE_URL.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}

/// Builds request headers for authenticated endpoints.
///
/// A missing or malformed token yields an empty Authorization value rather
/// than a missing header, matching what the server expects from signed-out
/// clients.
pub fn auth_headers(access: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let authorization = match access {
        Some(token) => HeaderValue::from_str(&format!("Bearer {token}"))
            .unwrap_or_else(|_| HeaderValue::from_static("")),
        None => HeaderValue::from_static(""),
    };
    headers.insert("Authorization", authorization);
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers
}

fn classify_transport_error(e: &reqwest::Error) -> ApiError {
    let details = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        format!("transport error: {e}")
    };
    ApiError::network(details)
}

/// Pulls the `detail` string out of an auth error body, if present.
fn extract_detail(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(detail) = json.get("detail").and_then(|v| v.as_str())
    {
        return Some(detail.to_string());
    }
    None
}

/// Pulls the first field-level error out of a registration error body.
///
/// Fields are checked in a fixed order so multi-field failures always
/// surface the same message.
fn extract_field_error(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    for field in ["username", "email", "password"] {
        if let Some(message) = json.get(field).and_then(|v| v.get(0)).and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }
    None
}

// ============================================================================
// Client
// ============================================================================

/// Client for the todo API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against a specific base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from configuration, resolving the base URL.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = resolve_base_url(config.api.effective_base_url())?;
        Ok(Self::new(base_url))
    }

    /// Returns the resolved base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchanges credentials for a token pair via `POST /token/`.
    ///
    /// Rejections surface the server's `detail` message when present.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let url = format!("{}/token/", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("login rejected (HTTP {})", status.as_u16());
            let message =
                extract_detail(&body).unwrap_or_else(|| LOGIN_FALLBACK_ERROR.to_string());
            return Err(ApiError::server(message, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("invalid token response: {e}")))
    }

    /// Creates an account via `POST /register/`; the server logs the new
    /// user in and returns a token pair.
    ///
    /// Passwords shorter than 8 characters are rejected locally without a
    /// network call. Server rejections surface the first field error in
    /// username > email > password order.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<TokenPair> {
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(ApiError::validation(PASSWORD_TOO_SHORT_ERROR));
        }

        let url = format!("{}/register/", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("registration rejected (HTTP {})", status.as_u16());
            let message =
                extract_field_error(&body).unwrap_or_else(|| REGISTER_FALLBACK_ERROR.to_string());
            return Err(ApiError::server(message, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("invalid token response: {e}")))
    }

    /// Fetches all todos for the current session via `GET /todos/`.
    pub async fn list_todos(&self, access: Option<&str>) -> ApiResult<Vec<Todo>> {
        let url = format!("{}/todos/", self.base_url);
        let response = self
            .http
            .get(&url)
            .headers(auth_headers(access))
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::unauthorized());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("todo list rejected (HTTP {})", status.as_u16());
            return Err(ApiError::server(FETCH_TODOS_ERROR, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("invalid todos response: {e}")))
    }

    /// Creates a todo via `POST /todos/` and returns the stored item.
    ///
    /// The caller is responsible for trimming the title and dropping empty
    /// submissions before calling.
    pub async fn create_todo(&self, access: Option<&str>, title: &str) -> ApiResult<Todo> {
        let url = format!("{}/todos/", self.base_url);
        let response = self
            .http
            .post(&url)
            .headers(auth_headers(access))
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::unauthorized());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("todo create rejected (HTTP {})", status.as_u16());
            return Err(ApiError::server(ADD_TODO_ERROR, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("invalid todo response: {e}")))
    }

    /// Deletes a todo by id via `DELETE /todos/{id}/`.
    pub async fn delete_todo(&self, access: Option<&str>, id: i64) -> ApiResult<()> {
        let url = format!("{}/todos/{id}/", self.base_url);
        let response = self
            .http
            .delete(&url)
            .headers(auth_headers(access))
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::unauthorized());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("todo delete rejected (HTTP {})", status.as_u16());
            return Err(ApiError::server(DELETE_TODO_ERROR, &body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Test: headers carry a Bearer token when one is stored.
    #[test]
    fn test_auth_headers_with_token() {
        let headers = auth_headers(Some("tok-123"));
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer tok-123");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
    }

    /// Test: headers fall back to an empty Authorization value without a token.
    #[test]
    fn test_auth_headers_without_token() {
        let headers = auth_headers(None);
        assert_eq!(headers.get("Authorization").unwrap(), "");
    }

    /// Test: field errors surface in username > email > password order.
    #[test]
    fn test_extract_field_error_priority() {
        let body = r#"{
            "email": ["Enter a valid email address."],
            "username": ["A user with that username already exists."]
        }"#;
        assert_eq!(
            extract_field_error(body).as_deref(),
            Some("A user with that username already exists.")
        );

        let body = r#"{"password": ["This password is too common."]}"#;
        assert_eq!(
            extract_field_error(body).as_deref(),
            Some("This password is too common.")
        );

        assert_eq!(extract_field_error("{}"), None);
        assert_eq!(extract_field_error("not json"), None);
    }

    /// Test: trailing slashes on the base URL don't double up in paths.
    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    /// Test: login returns the pair issued by the server.
    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .and(body_json(json!({"username": "alice", "password": "hunter22"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access": "acc-1", "refresh": "ref-1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let pair = client.login("alice", "hunter22").await.unwrap();
        assert_eq!(pair.access, "acc-1");
        assert_eq!(pair.refresh.as_deref(), Some("ref-1"));
    }

    /// Test: a rejected login surfaces the server's detail message.
    #[tokio::test]
    async fn test_login_wrong_password_uses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.message, "Invalid credentials");
    }

    /// Test: a rejected login without a detail field uses the fallback.
    #[tokio::test]
    async fn test_login_failure_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.login("alice", "pw").await.unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.details.as_deref(), Some("boom"));
    }

    /// Test: short passwords never reach the network.
    #[tokio::test]
    async fn test_register_short_password_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.register("bob", "b@x.com", "short").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.message, "Password must be at least 8 characters long");
    }

    /// Test: register returns the pair and logs the new account in.
    #[tokio::test]
    async fn test_register_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register/"))
            .and(body_json(json!({
                "username": "bob",
                "email": "b@x.com",
                "password": "longenough",
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"access": "acc-2", "refresh": "ref-2"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let pair = client.register("bob", "b@x.com", "longenough").await.unwrap();
        assert_eq!(pair.access, "acc-2");
    }

    /// Test: register surfaces the highest-priority field error.
    #[tokio::test]
    async fn test_register_field_error_priority() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "password": ["This password is too common."],
                "username": ["A user with that username already exists."],
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client
            .register("bob", "b@x.com", "longenough")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.message, "A user with that username already exists.");
    }

    /// Test: register falls back to a generic message on an opaque rejection.
    #[tokio::test]
    async fn test_register_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client
            .register("bob", "b@x.com", "longenough")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Registration failed");
    }

    /// Test: list sends the Bearer header and parses the collection.
    #[tokio::test]
    async fn test_list_todos_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .and(header("Authorization", "Bearer acc-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "title": "Walk dog", "created_at": "2024-05-01T10:00:00Z"},
                {"id": 1, "title": "Buy milk"},
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let todos = client.list_todos(Some("acc-1")).await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].title, "Walk dog");
        assert_eq!(todos[1].id, 1);
    }

    /// Test: a 401 on list maps to the unauthorized kind, no retry.
    #[tokio::test]
    async fn test_list_todos_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Given token not valid for any token type",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.list_todos(Some("stale")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    }

    /// Test: a non-401 list failure keeps the generic fetch message.
    #[tokio::test]
    async fn test_list_todos_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.list_todos(Some("acc-1")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.message, "Failed to fetch todos");
    }

    /// Test: create posts the title and returns the stored todo.
    #[tokio::test]
    async fn test_create_todo_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos/"))
            .and(body_json(json!({"title": "Walk dog"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 2, "title": "Walk dog"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let todo = client.create_todo(Some("acc-1"), "Walk dog").await.unwrap();
        assert_eq!(todo, Todo { id: 2, title: "Walk dog".to_string() });
    }

    /// Test: create failures use the fixed add message.
    #[tokio::test]
    async fn test_create_todo_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.create_todo(Some("acc-1"), "Walk dog").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.message, "Failed to add todo");
    }

    /// Test: delete hits the id-scoped path and succeeds on 204.
    #[tokio::test]
    async fn test_delete_todo_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/7/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        client.delete_todo(Some("acc-1"), 7).await.unwrap();
    }

    /// Test: a 401 on delete maps to the unauthorized kind.
    #[tokio::test]
    async fn test_delete_todo_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/7/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.delete_todo(Some("stale"), 7).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    }

    /// Test: an unreachable server maps to the network kind with the fixed
    /// display message.
    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 1 is never listening on loopback.
        let client = ApiClient::new("http://127.0.0.1:1");
        let err = client.login("alice", "hunter22").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
        assert_eq!(err.message, "Network error. Please try again.");
        assert!(err.details.is_some());
    }
}
