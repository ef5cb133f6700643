//! Wire types for the todo API.

use serde::{Deserialize, Serialize};

/// A single todo item as returned by the server.
///
/// Extra response fields (timestamps etc.) are ignored on deserialize so
/// server-side additions don't break older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
}

/// Token pair issued by the login and register endpoints.
///
/// The refresh token is optional on the wire; when absent, the store keeps
/// whatever refresh token it already holds.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: unknown fields in a todo payload are ignored.
    #[test]
    fn test_todo_ignores_unknown_fields() {
        let todo: Todo = serde_json::from_str(
            r#"{"id": 3, "title": "Buy milk", "created_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, 3);
        assert_eq!(todo.title, "Buy milk");
    }

    /// Test: a token response without a refresh token still parses.
    #[test]
    fn test_token_pair_refresh_optional() {
        let pair: TokenPair = serde_json::from_str(r#"{"access": "abc"}"#).unwrap();
        assert_eq!(pair.access, "abc");
        assert!(pair.refresh.is_none());

        let pair: TokenPair =
            serde_json::from_str(r#"{"access": "abc", "refresh": "def"}"#).unwrap();
        assert_eq!(pair.refresh.as_deref(), Some("def"));
    }
}
