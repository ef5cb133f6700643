//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! The runtime uses an "inbox" pattern for async event collection:
//! - Spawned API calls send `UiEvent`s directly to `inbox_tx`
//! - Runtime drains `inbox_rx` each pass to collect results
//! - This eliminates per-operation receivers and simplifies event collection

use std::future::Future;
use std::io::Stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tudu_core::session::Session;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// How long to block waiting for terminal input when nothing is pending.
pub const POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal, state, and session. Runs the event loop and executes
/// effects. Terminal state is guaranteed to be restored on drop, panic, or
/// Ctrl+C.
pub struct TuiRuntime {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state.
    state: AppState,
    /// API client and token store.
    session: Session,
    /// Inbox sender - spawned API calls send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each pass.
    inbox_rx: UiEventReceiver,
}

impl TuiRuntime {
    /// Creates a new TUI runtime.
    ///
    /// Must be called from within a tokio runtime, since effects spawn tasks.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(session: Session) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();

        // Enter alternate screen and raw mode
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (state, effects) = AppState::new(session.is_authenticated());

        // Create inbox channel for async event collection
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let mut runtime = Self {
            terminal,
            state,
            session,
            inbox_tx,
            inbox_rx,
        };
        runtime.execute_effects(effects);
        Ok(runtime)
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            let events = self.collect_events()?;

            if !events.is_empty() {
                for event in events {
                    let effects = update::update(&mut self.state, event);
                    self.execute_effects(effects);
                }
                dirty = true;
            }

            // Only render if something changed
            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the inbox and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Drain inbox - all async API results arrive here
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        // Poll terminal events:
        // - If we already have events to process, do a non-blocking poll
        // - Otherwise, block briefly so pending inbox events are picked up soon
        let poll_duration = if events.is_empty() {
            POLL_DURATION
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    /// Executes effects returned by the reducer.
    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect, sending the resulting event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Executes a single effect.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }

            UiEffect::SubmitLogin { username, password } => {
                let client = self.session.client().clone();
                self.spawn_effect(move || async move {
                    UiEvent::LoginResult(client.login(&username, &password).await)
                });
            }
            UiEffect::SubmitRegister {
                username,
                email,
                password,
            } => {
                let client = self.session.client().clone();
                self.spawn_effect(move || async move {
                    UiEvent::RegisterResult(client.register(&username, &email, &password).await)
                });
            }

            UiEffect::FetchTodos => {
                let client = self.session.client().clone();
                let access = self.session.access_token().map(str::to_string);
                self.spawn_effect(move || async move {
                    UiEvent::TodosFetched(client.list_todos(access.as_deref()).await)
                });
            }
            UiEffect::CreateTodo { title } => {
                let client = self.session.client().clone();
                let access = self.session.access_token().map(str::to_string);
                self.spawn_effect(move || async move {
                    UiEvent::TodoCreated(client.create_todo(access.as_deref(), &title).await)
                });
            }
            UiEffect::DeleteTodo { id } => {
                let client = self.session.client().clone();
                let access = self.session.access_token().map(str::to_string);
                self.spawn_effect(move || async move {
                    UiEvent::TodoDeleted {
                        id,
                        result: client.delete_todo(access.as_deref(), id).await,
                    }
                });
            }

            // Token persistence failures must not take down the UI; the
            // session still works in memory for the rest of the run.
            UiEffect::PersistTokens { pair } => {
                if let Err(e) = self.session.store_tokens(&pair) {
                    tracing::warn!("failed to persist tokens: {e:#}");
                }
            }
            UiEffect::ClearTokens => {
                if let Err(e) = self.session.logout() {
                    tracing::warn!("failed to clear tokens: {e:#}");
                }
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
