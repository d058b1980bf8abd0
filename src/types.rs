use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{error::ApiError, utils};

/// Longest mood text kept, in characters. Longer input is truncated.
pub const MAX_MOOD_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is no longer valid.
    pub expires_at: i64,
}

impl Credential {
    pub fn from_token_response(token: TokenResponse, now: i64) -> Self {
        Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: expiry_after(now, token.expires_in),
        }
    }

    /// True when the token expires within `leeway` seconds of `now`.
    pub fn expires_within(&self, now: i64, leeway: i64) -> bool {
        now >= self.expires_at.saturating_sub(leeway)
    }
}

/// Absolute expiry for a token issued at `now` that lives `expires_in` seconds.
///
/// `expires_in` comes from the token endpoint; out-of-range values saturate
/// at `i64::MAX` instead of overflowing.
pub fn expiry_after(now: i64, expires_in: u64) -> i64 {
    now.saturating_add(i64::try_from(expires_in).unwrap_or(i64::MAX))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// The token endpoint may omit `refresh_token` when renewing.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodQuery {
    pub mood: String,
    pub emoji: Option<String>,
}

impl MoodQuery {
    /// Trims and truncates the mood to [`MAX_MOOD_LENGTH`] characters.
    /// A blank emoji counts as no emoji.
    pub fn new(mood: &str, emoji: Option<String>) -> Result<Self, ApiError> {
        let mood = utils::truncate_mood(mood.trim());
        if mood.is_empty() {
            return Err(ApiError::EmptyMood);
        }

        let emoji = emoji
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(MoodQuery { mood, emoji })
    }

    pub fn playlist_name(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("Mood: {} {}", self.mood, emoji),
            None => format!("Mood: {}", self.mood),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Tracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracks {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Assistant message in a completion. `content` is `null` for refusals and
/// tool calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Progress of a playlist generation, sent from the background task to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistEvent {
    DescriptionReady(String),
    PlaylistCreated { id: String, name: String },
    TracksSuggested(usize),
    TrackUnresolved(String),
    TracksAdded(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOutcome {
    pub playlist_id: String,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub tracks_added: usize,
    pub unresolved: Vec<String>,
}

#[derive(Tabled)]
pub struct HistoryTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub mood: String,
}
