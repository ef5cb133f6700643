//! Session state shared by the CLI and the TUI.
//!
//! A [`Session`] is the single owner of the API client and the on-disk
//! token store. Authentication state is derived from the store on every
//! check, so callers never hold a cached copy that can go stale.

use anyhow::Result;

use crate::api::{ApiClient, ApiResult, Todo, TokenPair};
use crate::config::Config;
use crate::tokens::{TokenStore, mask_token};

pub struct Session {
    client: ApiClient,
    tokens: TokenStore,
}

impl Session {
    /// Builds a session from configuration and the default token store.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ApiClient::from_config(config)?,
            tokens: TokenStore::load()?,
        })
    }

    /// Builds a session from explicit parts.
    pub fn new(client: ApiClient, tokens: TokenStore) -> Self {
        Self { client, tokens }
    }

    /// Whether an access token is currently stored.
    ///
    /// Presence is all that is checked; an expired token surfaces later as
    /// a 401 on the first authenticated request.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.access().is_some()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens.access()
    }

    /// Persists a token pair issued by login or registration.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn store_tokens(&mut self, pair: &TokenPair) -> Result<()> {
        tracing::debug!("storing token pair (access {})", mask_token(&pair.access));
        self.tokens.set(&pair.access, pair.refresh.as_deref())
    }

    /// Drops stored tokens. Returns whether any were present.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn logout(&mut self) -> Result<bool> {
        let had_tokens = self.tokens.clear()?;
        if had_tokens {
            tracing::info!("session cleared");
        }
        Ok(had_tokens)
    }

    /// Logs in and persists the issued pair.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let pair = self.client.login(username, password).await?;
        self.store_tokens(&pair)?;
        tracing::info!("logged in as {username}");
        Ok(())
    }

    /// Registers an account and persists the issued pair.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<()> {
        let pair = self.client.register(username, email, password).await?;
        self.store_tokens(&pair)?;
        tracing::info!("registered account {username}");
        Ok(())
    }

    /// Fetches todos with the stored access token.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_todos(&self) -> ApiResult<Vec<Todo>> {
        self.client.list_todos(self.tokens.access()).await
    }

    /// Creates a todo with the stored access token.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_todo(&self, title: &str) -> ApiResult<Todo> {
        self.client.create_todo(self.tokens.access(), title).await
    }

    /// Deletes a todo with the stored access token.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn delete_todo(&self, id: i64) -> ApiResult<()> {
        self.client.delete_todo(self.tokens.access(), id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn session_with_store(base_url: &str, dir: &std::path::Path) -> Session {
        let store = TokenStore::load_from(dir.join("tokens.json")).unwrap();
        Session::new(ApiClient::new(base_url), store)
    }

    /// Test: a successful login persists the issued pair to disk.
    #[tokio::test]
    async fn test_login_persists_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access": "acc-1", "refresh": "ref-1"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_store(&server.uri(), dir.path());
        assert!(!session.is_authenticated());

        session.login("alice", "hunter22").await.unwrap();
        assert!(session.is_authenticated());

        let reloaded = TokenStore::load_from(dir.path().join("tokens.json")).unwrap();
        assert_eq!(reloaded.access(), Some("acc-1"));
        assert_eq!(reloaded.refresh(), Some("ref-1"));
    }

    /// Test: a rejected login leaves the store untouched.
    #[tokio::test]
    async fn test_failed_login_stores_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_store(&server.uri(), dir.path());
        let err = session.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!session.is_authenticated());
        assert!(!dir.path().join("tokens.json").exists());
    }

    /// Test: logout removes the token file and reports prior presence.
    #[tokio::test]
    async fn test_logout_clears_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TokenStore::load_from(dir.path().join("tokens.json")).unwrap();
        store.set("acc-1", Some("ref-1")).unwrap();

        let mut session = Session::new(ApiClient::new("http://localhost:8000/api"), store);
        assert!(session.is_authenticated());
        assert!(session.logout().unwrap());
        assert!(!session.is_authenticated());
        assert!(!dir.path().join("tokens.json").exists());
        assert!(!session.logout().unwrap());
    }

    /// Test: todo requests carry the stored access token.
    #[tokio::test]
    async fn test_list_todos_sends_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .and(header("Authorization", "Bearer acc-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_store(&server.uri(), dir.path());
        session
            .store_tokens(&TokenPair { access: "acc-9".to_string(), refresh: None })
            .unwrap();

        let todos = session.list_todos().await.unwrap();
        assert!(todos.is_empty());
    }
}
