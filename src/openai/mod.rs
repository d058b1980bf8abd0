//! Chat-completion client that writes playlist content for a mood.
//!
//! Two calls per playlist: one for the description, one for a list of
//! `Song Title - Artist` suggestions. Both send a fixed system prompt and a
//! user prompt built from the mood and emoji, then use the first choice.

use reqwest::Client;

use crate::{
    config::OpenAiConfig,
    error::{ApiError, read_json},
    types::{ChatCompletionRequest, ChatCompletionResponse, Message},
    utils,
};

const DESCRIPTION_MAX_TOKENS: u32 = 150;
const SUGGESTIONS_MAX_TOKENS: u32 = 300;

/// How many tracks the model is asked for.
pub const SUGGESTION_COUNT: usize = 10;

const DESCRIPTION_SYSTEM_PROMPT: &str =
    "You are a music expert who creates engaging playlist descriptions.";
const SUGGESTIONS_SYSTEM_PROMPT: &str = "You are a music expert who creates perfect playlists.";

pub fn description_prompt(mood: &str, emoji: Option<&str>) -> String {
    format!(
        "Generate a playlist description for a Spotify playlist based on the following mood and emoji:\n\
         Mood: {mood}\n\
         Emoji: {emoji}\n\
         \n\
         The description should be concise (max 100 characters) and capture the emotional essence of the playlist.\n\
         Include relevant genres and musical characteristics that would match this mood.",
        mood = mood,
        emoji = emoji.unwrap_or("none"),
    )
}

pub fn suggestions_prompt(mood: &str, emoji: Option<&str>) -> String {
    format!(
        "Generate a list of {count} song titles and artists that would match the following mood and emoji:\n\
         Mood: {mood}\n\
         Emoji: {emoji}\n\
         \n\
         Format each suggestion as: \"Song Title - Artist\"\n\
         Return only the list, one song per line.",
        count = SUGGESTION_COUNT,
        mood = mood,
        emoji = emoji.unwrap_or("none"),
    )
}

#[derive(Clone)]
pub struct PromptClient {
    http: Client,
    config: OpenAiConfig,
}

impl PromptClient {
    pub fn new(config: OpenAiConfig) -> Self {
        PromptClient {
            http: Client::new(),
            config,
        }
    }

    /// A short playlist description for the mood.
    pub async fn describe_playlist(&self, mood: &str, emoji: Option<&str>) -> Result<String, ApiError> {
        let content = self
            .complete(
                DESCRIPTION_SYSTEM_PROMPT,
                &description_prompt(mood, emoji),
                DESCRIPTION_MAX_TOKENS,
            )
            .await?;

        Ok(content.trim().to_string())
    }

    /// Track suggestions, one `Song Title - Artist` per entry.
    pub async fn suggest_tracks(&self, mood: &str, emoji: Option<&str>) -> Result<Vec<String>, ApiError> {
        let content = self
            .complete(
                SUGGESTIONS_SYSTEM_PROMPT,
                &suggestions_prompt(mood, emoji),
                SUGGESTIONS_MAX_TOKENS,
            )
            .await?;

        Ok(utils::split_suggestions(&content))
    }

    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String, ApiError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message::system(system), Message::user(prompt)],
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let completion: ChatCompletionResponse = read_json(response).await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse("completion has no choices".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| ApiError::InvalidResponse("completion message has no content".to_string()))
    }
}
