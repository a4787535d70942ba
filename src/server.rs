use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{Res, api, types::PkceToken, warning};

/// Binds the OAuth callback server and serves it in the background.
///
/// `callback_path` is the path of the configured redirect URI. Binding errors
/// are returned before anything is spawned; abort the returned handle once the
/// code has arrived.
pub async fn start_callback_server(
    addr: &str,
    callback_path: &str,
    state: Arc<Mutex<Option<PkceToken>>>,
) -> Res<JoinHandle<()>> {
    let path = if callback_path.is_empty() || callback_path == "/" {
        "/callback"
    } else {
        callback_path
    };

    let app = Router::new()
        .route("/health", get(api::health))
        .route(path, get(api::callback))
        .layer(Extension(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}
