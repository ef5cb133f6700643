//! UI event types.
//!
//! Events are the inputs to the reducer: raw terminal input plus the
//! completions of async work the runtime spawned. Completion events carry
//! the full `Result` so the reducer decides how each failure surfaces.

use tudu_core::api::{ApiError, Todo, TokenPair};

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Raw terminal input (keys, resize).
    Terminal(crossterm::event::Event),

    /// A login request finished.
    LoginResult(Result<TokenPair, ApiError>),

    /// A registration request finished.
    RegisterResult(Result<TokenPair, ApiError>),

    /// The todo list fetch finished.
    TodosFetched(Result<Vec<Todo>, ApiError>),

    /// A create request finished.
    TodoCreated(Result<Todo, ApiError>),

    /// A delete request finished for the given id.
    TodoDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
}
