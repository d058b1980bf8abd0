//! # API Module
//!
//! HTTP handlers for the local server that catches the OAuth redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - Target of the Spotify redirect. Hands the redirect URL
//!   to [`crate::spotify::auth::AuthorizationFlow::handle_redirect`] and
//!   reports the outcome to the waiting `auth` command over a channel.
//! - [`health`] - Status, version and the current authorization state.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use moodmatch::api::{CallbackState, callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```

mod callback;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
