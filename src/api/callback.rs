use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::PkceToken, warning};

/// Receives Spotify's redirect and hands the code to the waiting flow.
///
/// The code is only accepted when the `state` parameter matches the pending
/// authorization; the token exchange itself happens in the waiting flow.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PkceToken>>>>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        warning!("Spotify authorization was denied: {}", error);
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&pending.state) {
        warning!("Ignoring callback with a mismatched state parameter");
        return Html("<h4>State mismatch.</h4>");
    }

    pending.code = Some(code.clone());
    Html("<h2>Authorization received.</h2><p>You can close this browser window.</p>")
}
