use std::fmt;

use crate::management::StoreError;

/// Everything that can end a user action early.
///
/// One enum is shared by the authorization flow, the Spotify client, the
/// prompt client and the orchestrator, so a failed action surfaces as a
/// single value the CLI can report.
#[derive(Debug)]
pub enum ApiError {
    /// No credential is available; the user has to run `moodmatch auth`.
    NotAuthenticated,
    /// The redirect carried no usable authorization code.
    InvalidCallback(String),
    /// Exchanging the code (or refreshing the token) did not produce a credential.
    TokenExchangeFailed(String),
    /// The server answered with a non-2xx status.
    RequestFailed { status: u16, body: String },
    /// The request never got an answer (DNS, TLS, connection reset...).
    Transport(reqwest::Error),
    /// The response body was not the JSON we expected.
    DecodeFailed(String),
    /// The response decoded but lacks the field we need.
    InvalidResponse(String),
    /// The mood was empty after trimming.
    EmptyMood,
    Storage(StoreError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotAuthenticated => {
                write!(f, "not authenticated with Spotify, run `moodmatch auth`")
            }
            ApiError::InvalidCallback(reason) => write!(f, "invalid callback: {}", reason),
            ApiError::TokenExchangeFailed(reason) => {
                write!(f, "token exchange failed: {}", reason)
            }
            ApiError::RequestFailed { status, body } => {
                write!(f, "request failed with status {}: {}", status, body)
            }
            ApiError::Transport(e) => write!(f, "request could not be sent: {}", e),
            ApiError::DecodeFailed(reason) => write!(f, "cannot decode response: {}", reason),
            ApiError::InvalidResponse(reason) => write!(f, "invalid response: {}", reason),
            ApiError::EmptyMood => write!(f, "mood must not be empty"),
            ApiError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DecodeFailed(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Turns a response into its JSON body, mapping non-2xx to `RequestFailed`
/// and malformed bodies to `DecodeFailed`.
pub(crate) async fn read_json<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::DecodeFailed(e.to_string()))
}

/// Maps a non-2xx response to `RequestFailed`, keeping the body for the message.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::RequestFailed {
        status: status.as_u16(),
        body,
    })
}
