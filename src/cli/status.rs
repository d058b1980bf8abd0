use chrono::{DateTime, Local};

use crate::{
    cli::load_auth,
    config::Config,
    info,
    management::{MAX_HISTORY_ENTRIES, MoodHistory, TokenStore},
    spotify::auth::AuthState,
    success, utils, warning,
};

pub async fn status(config: &Config) {
    let auth = load_auth(config).await;

    match auth.lock().await.state() {
        AuthState::Authenticated(credential) => {
            success!("Authenticated with Spotify");
            let remaining = credential.expires_at - utils::now_seconds();
            match DateTime::from_timestamp(credential.expires_at, 0) {
                Some(at) if remaining > 0 => info!(
                    "Access token valid until {} (renewed automatically)",
                    at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ),
                _ => info!("Access token expired, it will be renewed on the next request"),
            }
        }
        _ => warning!("Not authenticated. Please run moodmatch auth"),
    }
    info!("Token file: {}", TokenStore::default_location().path().display());

    match MoodHistory::load(MoodHistory::default_path()).await {
        Ok(history) => info!(
            "Mood history: {}/{} entries",
            history.entries().len(),
            MAX_HISTORY_ENTRIES
        ),
        Err(e) => warning!("Mood history unreadable: {}", e),
    }
}
