//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

use tudu_core::api::TokenPair;

/// Effects returned by the reducer for the runtime to execute.
///
/// The reducer returns `Vec<UiEffect>` from each update call.
/// The runtime executes these effects after the event batch is processed.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Spawn a login request with the given credentials.
    SubmitLogin { username: String, password: String },

    /// Spawn a registration request.
    SubmitRegister {
        username: String,
        email: String,
        password: String,
    },

    /// Spawn a fetch of the full todo list.
    FetchTodos,

    /// Spawn a create request. The title is already trimmed.
    CreateTodo { title: String },

    /// Spawn a delete request for the given id.
    DeleteTodo { id: i64 },

    /// Persist a token pair issued by login or registration.
    PersistTokens { pair: TokenPair },

    /// Drop stored tokens (logout or forced session expiry).
    ClearTokens,
}
