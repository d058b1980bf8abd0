use std::{collections::HashMap, sync::Arc};

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config::SpotifyConfig,
    error::ApiError,
    management::TokenStore,
    types::{Credential, RefreshResponse, TokenResponse, expiry_after},
    utils,
};

/// Permissions requested from the user. Creating private playlists needs
/// `playlist-modify-private`; `user-read-private` covers `GET /me`.
pub const AUTH_SCOPE: &str = "playlist-modify-public playlist-modify-private user-read-private";

/// Renew the access token this many seconds before it actually expires.
const EXPIRY_LEEWAY_SECS: i64 = 240;

/// The flow as shared between the callback server and the API client.
pub type SharedAuth = Arc<Mutex<AuthorizationFlow>>;

/// Secrets generated for one authorize request, checked when the redirect comes back.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub code_verifier: String,
}

#[derive(Debug, Clone)]
pub enum AuthState {
    Unauthenticated,
    /// The authorize URL is out in a browser; waiting for the redirect.
    PendingCallback(PendingAuthorization),
    Authenticated(Credential),
}

/// Drives the OAuth 2.0 authorization-code grant against the Spotify
/// accounts service and owns the resulting credential.
///
/// # Lifecycle
///
/// ```text
/// Unauthenticated --begin_authorization--> PendingCallback
/// PendingCallback --handle_redirect (ok)--> Authenticated
/// PendingCallback --handle_redirect (err)--> PendingCallback
/// Authenticated   --logout--> Unauthenticated
/// ```
///
/// A stored credential found at construction time starts the flow in
/// `Authenticated`. Calling `begin_authorization` again from any state
/// starts over; the previous credential stays on disk until a new exchange
/// replaces it.
///
/// The request carries the client secret (confidential client) and a PKCE
/// challenge, plus a random `state` that the redirect has to echo back.
pub struct AuthorizationFlow {
    config: SpotifyConfig,
    store: TokenStore,
    http: Client,
    state: AuthState,
}

impl AuthorizationFlow {
    /// Creates the flow, picking up a previously stored credential.
    ///
    /// # Arguments
    ///
    /// * `config` - Client credentials and the accounts service endpoints
    /// * `store` - Where the credential is read from and written to
    ///
    /// # Returns
    ///
    /// A flow in `Authenticated` when `store` already holds a credential,
    /// otherwise in `Unauthenticated`. The stored token is not validated
    /// here; an expired one is renewed on first use by [`valid_credential`].
    ///
    /// # Errors
    ///
    /// `ApiError::Storage` when the token file exists but cannot be read or
    /// parsed.
    ///
    /// [`valid_credential`]: AuthorizationFlow::valid_credential
    pub async fn new(config: SpotifyConfig, store: TokenStore) -> Result<Self, ApiError> {
        let state = match store.load().await? {
            Some(credential) => AuthState::Authenticated(credential),
            None => AuthState::Unauthenticated,
        };

        Ok(AuthorizationFlow {
            config,
            store,
            http: Client::new(),
            state,
        })
    }

    pub fn shared(self) -> SharedAuth {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AuthState::PendingCallback(_))
    }

    pub fn current_credential(&self) -> Option<&Credential> {
        match &self.state {
            AuthState::Authenticated(credential) => Some(credential),
            _ => None,
        }
    }

    pub fn redirect_uri(&self) -> &Url {
        &self.config.redirect_uri
    }

    /// Builds the authorize URL to open in a browser and moves to `PendingCallback`.
    ///
    /// A fresh `state` value and PKCE code verifier are generated on every
    /// call and kept until the redirect comes back, so only the most recent
    /// authorize URL can complete the flow.
    ///
    /// # Returns
    ///
    /// The accounts service authorize URL carrying `client_id`,
    /// `response_type=code`, `redirect_uri`, the scope, `state` and the S256
    /// code challenge.
    ///
    /// # Example
    ///
    /// ```
    /// let url = flow.begin_authorization();
    /// webbrowser::open(url.as_str())?;
    /// ```
    ///
    /// The flow does not time out on its own; it waits for `handle_redirect`.
    pub fn begin_authorization(&mut self) -> Url {
        let pending = PendingAuthorization {
            state: utils::generate_state(),
            code_verifier: utils::generate_code_verifier(),
        };
        let code_challenge = utils::generate_code_challenge(&pending.code_verifier);

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.config.client_id.as_str())
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", AUTH_SCOPE)
            .append_pair("state", &pending.state)
            .append_pair("code_challenge", &code_challenge)
            .append_pair("code_challenge_method", "S256");

        self.state = AuthState::PendingCallback(pending);
        url
    }

    /// Completes the flow with the URL Spotify redirected the browser to.
    ///
    /// # Arguments
    ///
    /// * `url` - The full redirect URL, query string included
    ///
    /// # Returns
    ///
    /// The new credential, already persisted. The flow is `Authenticated`.
    ///
    /// # Errors
    ///
    /// - `InvalidCallback` - no authorization in progress, the user denied
    ///   access, `code` is missing or empty, or `state` does not match
    /// - `TokenExchangeFailed` - the token endpoint was unreachable, answered
    ///   non-2xx, or sent a body that is not a token response
    /// - `Storage` - the credential could not be written
    ///
    /// Rejected redirects (`InvalidCallback`) and failed exchanges
    /// (`TokenExchangeFailed`) leave the flow in `PendingCallback` and the
    /// stored credential untouched, so another redirect can still succeed.
    pub async fn handle_redirect(&mut self, url: &Url) -> Result<Credential, ApiError> {
        let pending = match &self.state {
            AuthState::PendingCallback(pending) => pending.clone(),
            _ => {
                return Err(ApiError::InvalidCallback(
                    "no authorization in progress".to_string(),
                ));
            }
        };

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        if let Some(reason) = params.get("error") {
            return Err(ApiError::InvalidCallback(format!(
                "authorization denied: {}",
                reason
            )));
        }

        let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
            return Err(ApiError::InvalidCallback(
                "missing code parameter".to_string(),
            ));
        };

        if params.get("state") != Some(&pending.state) {
            return Err(ApiError::InvalidCallback("state mismatch".to_string()));
        }

        let credential = self.exchange_code(code, &pending.code_verifier).await?;
        self.store.persist(&credential).await?;
        self.state = AuthState::Authenticated(credential.clone());

        Ok(credential)
    }

    /// Returns a credential that is good for at least a few more minutes,
    /// renewing it with the refresh token when needed.
    ///
    /// A credential within four minutes of expiry is renewed with
    /// `grant_type=refresh_token`. The renewed credential is persisted and
    /// replaces the one in memory. When the token endpoint sends no new
    /// refresh token, the old one is kept.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` - the flow holds no credential
    /// - `TokenExchangeFailed` - renewal failed; the old credential stays
    /// - `Storage` - the renewed credential could not be written
    pub async fn valid_credential(&mut self) -> Result<Credential, ApiError> {
        let credential = match &self.state {
            AuthState::Authenticated(credential) => credential.clone(),
            _ => return Err(ApiError::NotAuthenticated),
        };

        if !credential.expires_within(utils::now_seconds(), EXPIRY_LEEWAY_SECS) {
            return Ok(credential);
        }

        let renewed = self.refresh(&credential).await?;
        self.store.persist(&renewed).await?;
        self.state = AuthState::Authenticated(renewed.clone());

        Ok(renewed)
    }

    /// Forgets the credential, in memory and on disk.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        self.store.clear().await?;
        self.state = AuthState::Unauthenticated;
        Ok(())
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Credential, ApiError> {
        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code_verifier", verifier),
            ])
            .send()
            .await
            .map_err(|e| ApiError::TokenExchangeFailed(e.to_string()))?;

        let token: TokenResponse = read_token_body(response).await?;
        Ok(Credential::from_token_response(token, utils::now_seconds()))
    }

    async fn refresh(&self, credential: &Credential) -> Result<Credential, ApiError> {
        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credential.refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::TokenExchangeFailed(e.to_string()))?;

        let token: RefreshResponse = read_token_body(response).await?;

        Ok(Credential {
            access_token: token.access_token,
            refresh_token: token
                .refresh_token
                .unwrap_or_else(|| credential.refresh_token.clone()),
            expires_at: expiry_after(utils::now_seconds(), token.expires_in),
        })
    }
}

async fn read_token_body<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::TokenExchangeFailed(e.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::TokenExchangeFailed(format!(
            "token endpoint answered {}: {}",
            status, body
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| ApiError::TokenExchangeFailed(format!("unexpected token response: {}", e)))
}
