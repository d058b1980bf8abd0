use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time::Instant,
};

use crate::{
    api::CallbackState, cli::load_auth, config::Config, error, error::ApiError, info, server,
    success, warning,
};

enum WaitOutcome {
    Authenticated,
    TimedOut,
    Interrupted,
}

/// Runs the browser-based authorization and stores the resulting credential.
///
/// Starts the local callback server, opens the authorize URL in the default
/// browser and waits for a redirect that completes the flow. Rejected or
/// failed redirects are reported and the wait goes on, since the user can
/// retry in the browser. Without `timeout` the wait only ends on success or
/// Ctrl-C.
pub async fn auth(config: &Config, timeout: Option<u64>) {
    let auth = load_auth(config).await;

    let listener = match server::bind(&config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => error!(
            "Cannot start callback server on {}. Err: {}",
            config.server_addr, e
        ),
    };

    let (outcomes, mut rx) = mpsc::unbounded_channel();
    let state = CallbackState {
        auth: Arc::clone(&auth),
        outcomes,
    };
    let callback_path = config.spotify.redirect_uri.path().to_string();
    let server = tokio::spawn(async move {
        if let Err(e) = server::start_api_server(listener, &callback_path, state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = auth.lock().await.begin_authorization();
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }
    info!(
        "Waiting for Spotify to redirect to {}",
        config.spotify.redirect_uri
    );

    let outcome = wait_for_callback(&mut rx, timeout).await;
    server.abort();

    match outcome {
        WaitOutcome::Authenticated => success!("Authentication successful!"),
        WaitOutcome::TimedOut => error!("Authentication timed out."),
        WaitOutcome::Interrupted => error!("Authentication aborted."),
    }
}

async fn wait_for_callback(
    rx: &mut UnboundedReceiver<Result<(), ApiError>>,
    timeout: Option<u64>,
) -> WaitOutcome {
    let deadline = timeout.map(|secs| Instant::now() + Duration::from_secs(secs));

    loop {
        let expired = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            outcome = rx.recv() => match outcome {
                Some(Ok(())) => return WaitOutcome::Authenticated,
                Some(Err(e)) => warning!("{}. Waiting for another attempt...", e),
                // the server is gone, nothing can arrive anymore
                None => return WaitOutcome::Interrupted,
            },
            _ = expired => return WaitOutcome::TimedOut,
            _ = tokio::signal::ctrl_c() => return WaitOutcome::Interrupted,
        }
    }
}

pub async fn logout(config: &Config) {
    let auth = load_auth(config).await;
    let mut flow = auth.lock().await;

    if !flow.is_authenticated() {
        info!("Not logged in.");
        return;
    }

    match flow.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to remove stored token. Err: {}", e),
    }
}
