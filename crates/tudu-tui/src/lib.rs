//! Full-screen TUI implementation for tudu.

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod text;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use runtime::TuiRuntime;
use tudu_core::session::Session;

/// Runs the interactive todo UI until the user quits.
///
/// # Errors
/// Returns an error if stderr is not a terminal or terminal setup fails.
pub async fn run(session: Session) -> Result<()> {
    // The TUI needs a real terminal to render
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Use `tudu list`, `tudu add`, or `tudu rm` for non-interactive use."
        );
    }

    let mut runtime = TuiRuntime::new(session)?;
    runtime.run()
}
