//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tudu_core::session::Session;
use tudu_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "tudu")]
#[command(version = "0.1")]
#[command(about = "Terminal client for a todo-list API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the issued tokens
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "TUDU_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (at least 8 characters)
        #[arg(short, long, env = "TUDU_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out (clear stored tokens)
    Logout,

    /// List todos, newest first
    List,

    /// Add a todo
    Add {
        /// Title of the new todo
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Remove a todo
    Rm {
        /// The ID of the todo to remove
        #[arg(value_name = "TODO_ID")]
        id: i64,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines flush on exit
    let _log_guard = logging::init(&config::paths::logs_dir())?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // default to the interactive TUI
    let Some(command) = cli.command else {
        let session = Session::load(&config)?;
        return crate::modes::run_interactive(session).await;
    };

    match command {
        Commands::Login { username, password } => {
            commands::auth::login(&config, &username, &password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&config, &username, &email, &password).await,
        Commands::Logout => commands::auth::logout(&config),

        Commands::List => commands::todos::list(&config).await,
        Commands::Add { title } => commands::todos::add(&config, &title).await,
        Commands::Rm { id } => commands::todos::rm(&config, id).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
