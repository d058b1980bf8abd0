use axum::{Extension, extract::RawQuery, response::Html};
use tokio::sync::mpsc::UnboundedSender;

use crate::{error::ApiError, spotify::auth::SharedAuth};

/// What the callback handler needs: the flow to complete and a channel to
/// tell the waiting command how it went.
#[derive(Clone)]
pub struct CallbackState {
    pub auth: SharedAuth,
    pub outcomes: UnboundedSender<Result<(), ApiError>>,
}

/// Receives the browser redirect and completes the authorization flow.
///
/// The incoming query is grafted onto the configured redirect URI so the
/// flow sees the same URL Spotify redirected to.
pub async fn callback(
    RawQuery(query): RawQuery,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    let result = {
        let mut flow = state.auth.lock().await;
        let mut url = flow.redirect_uri().clone();
        url.set_query(query.as_deref());
        flow.handle_redirect(&url).await
    };

    let page = match &result {
        Ok(_) => Html("<h2>Authentication successful.</h2><p>You can close this window.</p>"),
        Err(ApiError::InvalidCallback(_)) => Html("<h4>Invalid callback.</h4>"),
        Err(_) => Html("<h4>Login failed.</h4>"),
    };

    let _ = state.outcomes.send(result.map(|_| ()));
    page
}
