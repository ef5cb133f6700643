//! Application state composition.
//!
//! This module defines the state hierarchy for the TUI:
//!
//! ```text
//! AppState
//! ├── view: View             (exactly one full-screen view at a time)
//! │   ├── Login(LoginForm)       (credentials, focus, error)
//! │   ├── Register(RegisterForm) (credentials, focus, error)
//! │   └── Todos(TodoListState)   (items, input line, selection, phase)
//! └── should_quit: bool
//! ```
//!
//! Views are mutually exclusive screens rather than an overlay stack. Async
//! completions carry no view identity, so the reducer checks the active view
//! before applying one and drops results that arrive after the view that
//! requested them was replaced.

use tudu_core::api::Todo;

use crate::effects::UiEffect;

// ============================================================================
// AppState
// ============================================================================

/// Top-level TUI state.
pub struct AppState {
    /// The active view.
    pub view: View,
    /// Flag indicating the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Creates the initial state for a session.
    ///
    /// An authenticated session starts on the todo list and immediately
    /// requests a fetch; otherwise the login form is shown.
    pub fn new(authenticated: bool) -> (Self, Vec<UiEffect>) {
        if authenticated {
            let state = Self {
                view: View::Todos(TodoListState::loading()),
                should_quit: false,
            };
            (state, vec![UiEffect::FetchTodos])
        } else {
            let state = Self {
                view: View::Login(LoginForm::default()),
                should_quit: false,
            };
            (state, vec![])
        }
    }
}

/// The active full-screen view.
#[derive(Debug)]
pub enum View {
    Login(LoginForm),
    Register(RegisterForm),
    Todos(TodoListState),
}

// ============================================================================
// Auth Forms
// ============================================================================

/// Fields of the login form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login form state.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    /// Error message shown below the fields.
    pub error: Option<String>,
    /// A login request is in flight; further submits are ignored.
    pub submitting: bool,
}

impl LoginForm {
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn focus_prev(&mut self) {
        // Two fields, so previous and next coincide
        self.focus_next();
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Fields of the registration form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    #[default]
    Username,
    Email,
    Password,
}

/// Registration form state.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub focus: RegisterField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl RegisterForm {
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            RegisterField::Username => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Username,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            RegisterField::Username => RegisterField::Password,
            RegisterField::Email => RegisterField::Username,
            RegisterField::Password => RegisterField::Email,
        };
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            RegisterField::Username => &mut self.username,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
        }
    }
}

// ============================================================================
// Todo List
// ============================================================================

/// Load phase of the todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Initial fetch in flight.
    Loading,
    /// Fetch completed; `todos` is current.
    Loaded,
    /// Fetch failed; `todos` holds whatever was visible before.
    Failed,
}

/// Todo list view state.
#[derive(Debug)]
pub struct TodoListState {
    pub phase: ListPhase,
    pub todos: Vec<Todo>,
    /// New-todo input line. Always focused while this view is active.
    pub input: String,
    /// Index of the selected list entry.
    pub selected: usize,
    /// Error message from the most recent failed operation. Kept until the
    /// next failure overwrites it.
    pub error: Option<String>,
    /// A create request is in flight; further submits are ignored.
    pub creating: bool,
    /// Id of the todo with a delete in flight, if any.
    pub deleting: Option<i64>,
}

impl TodoListState {
    /// Creates the state for a fresh fetch.
    pub fn loading() -> Self {
        Self {
            phase: ListPhase::Loading,
            todos: Vec::new(),
            input: String::new(),
            selected: 0,
            error: None,
            creating: false,
            deleting: None,
        }
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.todos.get(self.selected)
    }

    /// Keeps the selection inside the list after removals.
    pub fn clamp_selection(&mut self) {
        if self.selected >= self.todos.len() {
            self.selected = self.todos.len().saturating_sub(1);
        }
    }
}
