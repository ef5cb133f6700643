//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Async completions carry no view identity, so each handler checks the
//! active view first: a result arriving after the user navigated away is
//! dropped instead of mutating whatever replaced the view that asked for
//! it. The one exception is a successful login or registration, which is
//! honored from either auth form since the issued tokens are valid
//! regardless of which screen is showing.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tudu_core::api::{
    ApiError, ApiErrorKind, PASSWORD_MIN_CHARS, PASSWORD_TOO_SHORT_ERROR, Todo, TokenPair,
};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, ListPhase, LoginForm, RegisterForm, TodoListState, View};

/// Shown when the login form is submitted with an empty field.
const LOGIN_FIELDS_REQUIRED_ERROR: &str = "Username and password are required.";

/// Shown when the registration form is submitted with an empty field.
const REGISTER_FIELDS_REQUIRED_ERROR: &str = "All fields are required.";

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::LoginResult(result) => handle_login_result(app, result),
        UiEvent::RegisterResult(result) => handle_register_result(app, result),
        UiEvent::TodosFetched(result) => handle_todos_fetched(app, result),
        UiEvent::TodoCreated(result) => handle_todo_created(app, result),
        UiEvent::TodoDeleted { id, result } => handle_todo_deleted(app, id, result),
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Windows and kitty-protocol terminals report key releases too;
    // acting on both press and release doubles every keystroke.
    if matches!(key.kind, KeyEventKind::Release) {
        return vec![];
    }

    // Ctrl+C quits from every view. It is the only global chord: the todo
    // input line is always focused, so bare characters must insert text.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    match app.view {
        View::Login(_) => handle_login_key(app, key),
        View::Register(_) => handle_register_key(app, key),
        View::Todos(_) => handle_todos_key(app, key),
    }
}

fn handle_login_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let View::Login(form) = &mut app.view else {
        return vec![];
    };

    match key.code {
        KeyCode::Char('r') if ctrl => {
            app.view = View::Register(RegisterForm::default());
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            vec![]
        }
        KeyCode::Backspace => {
            form.focused_value_mut().pop();
            vec![]
        }
        KeyCode::Enter => submit_login(form),
        KeyCode::Char(c) if !ctrl && !alt => {
            form.focused_value_mut().push(c);
            vec![]
        }
        _ => vec![],
    }
}

fn submit_login(form: &mut LoginForm) -> Vec<UiEffect> {
    if form.submitting {
        return vec![];
    }
    // Error resets on submit, not on edit
    form.error = None;
    if form.username.is_empty() || form.password.is_empty() {
        form.error = Some(LOGIN_FIELDS_REQUIRED_ERROR.to_string());
        return vec![];
    }
    form.submitting = true;
    vec![UiEffect::SubmitLogin {
        username: form.username.clone(),
        password: form.password.clone(),
    }]
}

fn handle_register_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let View::Register(form) = &mut app.view else {
        return vec![];
    };

    match key.code {
        KeyCode::Esc => {
            app.view = View::Login(LoginForm::default());
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            vec![]
        }
        KeyCode::Backspace => {
            form.focused_value_mut().pop();
            vec![]
        }
        KeyCode::Enter => submit_register(form),
        KeyCode::Char(c) if !ctrl && !alt => {
            form.focused_value_mut().push(c);
            vec![]
        }
        _ => vec![],
    }
}

fn submit_register(form: &mut RegisterForm) -> Vec<UiEffect> {
    if form.submitting {
        return vec![];
    }
    form.error = None;
    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        form.error = Some(REGISTER_FIELDS_REQUIRED_ERROR.to_string());
        return vec![];
    }
    // Checked locally so a short password never leaves the form
    if form.password.chars().count() < PASSWORD_MIN_CHARS {
        form.error = Some(PASSWORD_TOO_SHORT_ERROR.to_string());
        return vec![];
    }
    form.submitting = true;
    vec![UiEffect::SubmitRegister {
        username: form.username.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
    }]
}

fn handle_todos_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let View::Todos(list) = &mut app.view else {
        return vec![];
    };

    match key.code {
        KeyCode::Char('l') if ctrl => {
            app.view = View::Login(LoginForm::default());
            vec![UiEffect::ClearTokens]
        }
        KeyCode::Char('d') if ctrl => delete_selected(list),
        KeyCode::Delete => delete_selected(list),
        KeyCode::Up => {
            list.selected = list.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            if list.selected + 1 < list.todos.len() {
                list.selected += 1;
            }
            vec![]
        }
        KeyCode::Backspace => {
            list.input.pop();
            vec![]
        }
        KeyCode::Enter => submit_todo(list),
        KeyCode::Char(c) if !ctrl && !alt => {
            list.input.push(c);
            vec![]
        }
        _ => vec![],
    }
}

fn submit_todo(list: &mut TodoListState) -> Vec<UiEffect> {
    if list.creating {
        return vec![];
    }
    let title = list.input.trim();
    // Blank input is dropped silently, input kept as typed
    if title.is_empty() {
        return vec![];
    }
    list.creating = true;
    vec![UiEffect::CreateTodo {
        title: title.to_string(),
    }]
}

fn delete_selected(list: &mut TodoListState) -> Vec<UiEffect> {
    if list.deleting.is_some() {
        return vec![];
    }
    let Some(todo) = list.selected_todo() else {
        return vec![];
    };
    let id = todo.id;
    list.deleting = Some(id);
    vec![UiEffect::DeleteTodo { id }]
}

// ============================================================================
// Async Completion Handlers
// ============================================================================

fn handle_login_result(app: &mut AppState, result: Result<TokenPair, ApiError>) -> Vec<UiEffect> {
    match result {
        Ok(pair) => enter_todos(app, pair),
        Err(e) => {
            if let View::Login(form) = &mut app.view {
                form.submitting = false;
                form.error = Some(e.message);
            }
            vec![]
        }
    }
}

fn handle_register_result(
    app: &mut AppState,
    result: Result<TokenPair, ApiError>,
) -> Vec<UiEffect> {
    match result {
        Ok(pair) => enter_todos(app, pair),
        Err(e) => {
            if let View::Register(form) = &mut app.view {
                form.submitting = false;
                form.error = Some(e.message);
            }
            vec![]
        }
    }
}

/// Switches to the todo list after a successful login or registration.
fn enter_todos(app: &mut AppState, pair: TokenPair) -> Vec<UiEffect> {
    if matches!(app.view, View::Todos(_)) {
        return vec![];
    }
    app.view = View::Todos(TodoListState::loading());
    vec![UiEffect::PersistTokens { pair }, UiEffect::FetchTodos]
}

fn handle_todos_fetched(
    app: &mut AppState,
    result: Result<Vec<Todo>, ApiError>,
) -> Vec<UiEffect> {
    let View::Todos(list) = &mut app.view else {
        return vec![];
    };
    match result {
        Ok(todos) => {
            list.phase = ListPhase::Loaded;
            list.todos = todos;
            list.selected = 0;
            vec![]
        }
        Err(e) if e.kind == ApiErrorKind::Unauthorized => force_logout(app, e),
        Err(e) => {
            // Whatever was on screen stays visible alongside the error
            list.phase = ListPhase::Failed;
            list.error = Some(e.message);
            vec![]
        }
    }
}

fn handle_todo_created(app: &mut AppState, result: Result<Todo, ApiError>) -> Vec<UiEffect> {
    let View::Todos(list) = &mut app.view else {
        return vec![];
    };
    list.creating = false;
    match result {
        Ok(todo) => {
            // Newest first; selection follows the new entry
            list.todos.insert(0, todo);
            list.selected = 0;
            list.input.clear();
            vec![]
        }
        Err(e) if e.kind == ApiErrorKind::Unauthorized => force_logout(app, e),
        Err(e) => {
            list.error = Some(e.message);
            vec![]
        }
    }
}

fn handle_todo_deleted(app: &mut AppState, id: i64, result: Result<(), ApiError>) -> Vec<UiEffect> {
    let View::Todos(list) = &mut app.view else {
        return vec![];
    };
    list.deleting = None;
    match result {
        Ok(()) => {
            // Remove exactly one entry; relative order of the rest is kept
            if let Some(index) = list.todos.iter().position(|todo| todo.id == id) {
                list.todos.remove(index);
            }
            list.clamp_selection();
            vec![]
        }
        Err(e) if e.kind == ApiErrorKind::Unauthorized => force_logout(app, e),
        Err(e) => {
            list.error = Some(e.message);
            vec![]
        }
    }
}

/// Replaces the current view with the login form after a 401.
///
/// The expiry message lands on the form so the user sees why they were
/// signed out, and stored tokens are wiped so the next start comes up
/// unauthenticated.
fn force_logout(app: &mut AppState, error: ApiError) -> Vec<UiEffect> {
    app.view = View::Login(LoginForm {
        error: Some(error.message),
        ..LoginForm::default()
    });
    vec![UiEffect::ClearTokens]
}
