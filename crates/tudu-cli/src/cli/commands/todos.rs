//! Todo command handlers.

use anyhow::Result;
use tudu_core::api::{ApiErrorKind, ApiResult};
use tudu_core::config::Config;
use tudu_core::session::Session;

fn require_login(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        anyhow::bail!("Not logged in. Run `tudu login` first.");
    }
    Ok(())
}

/// Unwraps an API result, turning a rejected token into a cleared session.
fn check_session<T>(session: &mut Session, result: ApiResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.kind == ApiErrorKind::Unauthorized => {
            session.logout()?;
            anyhow::bail!("Session expired. Run `tudu login` to sign in again.");
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list(config: &Config) -> Result<()> {
    let mut session = Session::load(config)?;
    require_login(&session)?;
    let result = session.list_todos().await;
    let todos = check_session(&mut session, result)?;

    if todos.is_empty() {
        println!("No todos yet.");
        return Ok(());
    }
    for todo in &todos {
        println!("{:>6}  {}", todo.id, todo.title);
    }
    Ok(())
}

pub async fn add(config: &Config, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Todo title cannot be empty.");
    }

    let mut session = Session::load(config)?;
    require_login(&session)?;
    let result = session.create_todo(title).await;
    let todo = check_session(&mut session, result)?;
    println!("Added todo {}: {}", todo.id, todo.title);
    Ok(())
}

pub async fn rm(config: &Config, id: i64) -> Result<()> {
    let mut session = Session::load(config)?;
    require_login(&session)?;
    let result = session.delete_todo(id).await;
    check_session(&mut session, result)?;
    println!("Removed todo {id}.");
    Ok(())
}
