use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{api::CallbackState, spotify::auth::AuthState};

/// Liveness plus where the authorization flow currently stands.
pub async fn health(Extension(state): Extension<CallbackState>) -> Json<Value> {
    let authorization = match state.auth.lock().await.state() {
        AuthState::Unauthenticated => "unauthenticated",
        AuthState::PendingCallback(_) => "pending",
        AuthState::Authenticated(_) => "authenticated",
    };

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorization": authorization,
    }))
}
