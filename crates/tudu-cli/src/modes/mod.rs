//! Runtime execution modes.
//!
//! - Subcommands: non-interactive one-shot commands (stdout/stderr)
//! - Default invocation: full-screen interactive terminal UI (optional feature)

#[cfg(feature = "tui")]
pub use tudu_tui::run as run_interactive;

#[cfg(not(feature = "tui"))]
pub async fn run_interactive(_session: tudu_core::session::Session) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
