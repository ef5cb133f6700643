//! Core tudu library (config, token store, API client, session).

pub mod api;
pub mod config;
pub mod logging;
pub mod session;
pub mod tokens;
