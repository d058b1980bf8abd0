use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::api::{self, CallbackState};

/// Routes of the callback server. `callback_path` is the path component of
/// the configured redirect URI.
pub fn router(callback_path: &str, state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(callback_path, get(api::callback))
        .layer(Extension(state))
}

pub async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    TcpListener::bind(addr).await
}

/// Serves until the task running it is dropped or aborted.
pub async fn start_api_server(
    listener: TcpListener,
    callback_path: &str,
    state: CallbackState,
) -> std::io::Result<()> {
    axum::serve(listener, router(callback_path, state)).await
}
