//! moodmatch library
//!
//! Turns a mood (and an optional emoji) into a Spotify playlist: a
//! chat-completion model writes the playlist description and suggests
//! tracks, and the Spotify Web API creates the playlist and fills it.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading from `.env` and environment variables
//! - `error` - Error taxonomy shared by the API clients
//! - `management` - Local persistence of the credential and mood history
//! - `openai` - Chat-completion client that generates playlist content
//! - `orchestrator` - Sequences one "mood to playlist" user action
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify authorization flow and Web API client
//! - `types` - Data structures and wire types
//! - `utils` - Small helpers (PKCE, prompt parsing, time)
//!
//! # Example
//!
//! ```
//! use moodmatch::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> moodmatch::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod openai;
pub mod orchestrator;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for top-level glue code.
///
/// Library operations return typed errors (see [`error::ApiError`]); this
/// alias is for places that only need to report a failure, such as the
/// binary's setup code.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for the Spotify redirect...");
/// info!("Suggested {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing, so it is
/// only meant for the CLI layer where nothing can be recovered.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser. Open this URL manually: {}", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
