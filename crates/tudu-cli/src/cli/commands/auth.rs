//! Auth command handlers.

use anyhow::Result;
use tudu_core::config::Config;
use tudu_core::session::Session;

pub async fn login(config: &Config, username: &str, password: &str) -> Result<()> {
    let mut session = Session::load(config)?;
    session.login(username, password).await?;
    println!("Logged in as {username}.");
    Ok(())
}

pub async fn register(config: &Config, username: &str, email: &str, password: &str) -> Result<()> {
    let mut session = Session::load(config)?;
    session.register(username, email, password).await?;
    println!("Registered and logged in as {username}.");
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let mut session = Session::load(config)?;
    if session.logout()? {
        println!("Logged out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}
