use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::MAX_MOOD_LENGTH;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value for the `state` parameter of the authorize request.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Keeps the first [`MAX_MOOD_LENGTH`] characters (not bytes) of the mood.
pub fn truncate_mood(mood: &str) -> String {
    mood.chars().take(MAX_MOOD_LENGTH).collect()
}

/// Splits a model answer into one suggestion per non-empty line.
///
/// Numbering (`1.`, `2)`) and bullets (`-`, `*`, `•`) in front of a line are
/// dropped, as are quotes around the title or the artist.
pub fn split_suggestions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(clean_suggestion)
        .filter(|line| !line.is_empty())
        .collect()
}

fn clean_suggestion(line: &str) -> String {
    let line = line.trim();

    // digits are ASCII, so the count is also a byte offset
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest = &line[digits..];
    let line = if digits > 0 && (rest.starts_with('.') || rest.starts_with(')')) {
        rest[1..].trim_start()
    } else {
        line
    };

    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or(line);

    match line.rsplit_once(" - ") {
        Some((title, artist)) => format!("{} - {}", unquote(title), unquote(artist)),
        None => unquote(line).to_string(),
    }
}

fn unquote(text: &str) -> &str {
    text.trim()
        .trim_matches(|c| matches!(c, '"' | '\u{201C}' | '\u{201D}'))
        .trim()
}

/// Builds a Spotify search query from a `Song Title - Artist` suggestion.
///
/// Falls back to the raw text when the line has no ` - ` separator.
pub fn search_query_for(suggestion: &str) -> String {
    match suggestion.rsplit_once(" - ") {
        Some((title, artist)) if !unquote(title).is_empty() && !unquote(artist).is_empty() => {
            format!("track:{} artist:{}", unquote(title), unquote(artist))
        }
        _ => unquote(suggestion).to_string(),
    }
}
