//! # CLI Module
//!
//! User-facing commands of moodmatch. Each command loads what it needs
//! (configuration, stored credential, mood history), delegates to the
//! library layers and turns the result into colored status lines.
//!
//! ## Commands
//!
//! - [`auth`] - Browser-based Spotify authorization with a local callback server
//! - [`logout`] - Forget the stored credential
//! - [`generate`] - Turn a mood (and emoji) into a playlist
//! - [`history`] - List or clear recently used moods
//! - [`status`] - Show authentication and history state
//!
//! ## Layers
//!
//! ```text
//! CLI Layer (commands, spinner, tables)
//!     ↓            ↑ PlaylistEvent channel
//! Orchestrator (one user action)
//!     ↓
//! openai / spotify clients ── management (token, history files)
//!     ↓
//! Network Layer (reqwest)
//! ```
//!
//! ## Error Handling
//!
//! Library calls return typed errors; this layer is where they end. Fatal
//! problems go through `error!` (prints and exits with status 1). A failed
//! generation shows the cause as a warning followed by one generic message,
//! and nothing is retried.
//!
//! ## Usage Patterns
//!
//! ```bash
//! moodmatch auth                              # Authorize with Spotify
//! moodmatch generate "rainy sunday" --emoji 🌧️ # Create a playlist
//! moodmatch history                           # Recently used moods
//! moodmatch status                            # Token and history state
//! ```

mod auth;
mod generate;
mod history;
mod status;

pub use auth::auth;
pub use auth::logout;
pub use generate::generate;
pub use history::history;
pub use status::status;

use crate::{
    config::Config,
    error,
    management::TokenStore,
    spotify::auth::{AuthorizationFlow, SharedAuth},
};

async fn load_auth(config: &Config) -> SharedAuth {
    match AuthorizationFlow::new(config.spotify.clone(), TokenStore::default_location()).await {
        Ok(flow) => flow.shared(),
        Err(e) => error!("Failed to load stored token. Err: {}", e),
    }
}
