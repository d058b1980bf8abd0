//! # Spotify Integration Module
//!
//! Everything moodmatch needs from Spotify: the OAuth 2.0
//! authorization-code flow and a small Web API client.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator / CLI
//!          ↓
//! SpotifyClient ──reads credential──> AuthorizationFlow ──> TokenStore
//!          ↓                                  ↑
//! Spotify Web API                      callback server (redirect)
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - [`auth::AuthorizationFlow`], the state machine that turns a
//!   browser redirect into a [`crate::types::Credential`] and renews it
//!   with the refresh token before it expires.
//! - `user` - `GET /me`
//! - `playlist` - `POST /users/{id}/playlists`, `POST /playlists/{id}/tracks`
//! - `search` - `GET /search`, used to turn a suggestion into a track URI
//!
//! ## Authentication
//!
//! The client never stores a token itself. Before every request it asks the
//! shared flow for a valid credential, so a login or a token renewal is
//! picked up by the next call. Without a credential a call fails with
//! [`ApiError::NotAuthenticated`] before anything is sent.
//!
//! ## Error Types
//!
//! All calls return [`ApiError`]:
//! - `NotAuthenticated` - no credential
//! - `RequestFailed` - non-2xx answer, with status and body
//! - `Transport` - the request never got an answer
//! - `DecodeFailed` - the body was not the expected JSON
//!
//! There are no retries; the caller decides what a failure means.
//!
//! ## Usage
//!
//! ```rust
//! let auth = AuthorizationFlow::new(config.spotify.clone(), TokenStore::default_location())
//!     .await?
//!     .shared();
//! let client = SpotifyClient::new(&config.spotify.api_url, auth);
//!
//! let user_id = client.fetch_current_user_id().await?;
//! let playlist = client.create_playlist(&user_id, "Mood: calm", "Quiet evening").await?;
//! client.add_tracks(&playlist.id, &uris).await?;
//! ```

pub mod auth;
mod playlist;
mod search;
mod user;

use reqwest::{Client, Url};

use crate::error::ApiError;
use auth::SharedAuth;

pub use playlist::MAX_TRACKS_PER_REQUEST;

/// Bearer-authenticated client for the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: Url,
    auth: SharedAuth,
}

impl SpotifyClient {
    pub fn new(api_url: &Url, auth: SharedAuth) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.clone(),
            auth,
        }
    }

    pub fn auth(&self) -> &SharedAuth {
        &self.auth
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        let mut flow = self.auth.lock().await;
        let credential = flow.valid_credential().await?;
        Ok(credential.access_token)
    }

    /// Appends `segments` to the base URL, percent-encoding each one, so IDs
    /// with `/`, `?` or spaces stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // config rejects URLs that cannot be a base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
