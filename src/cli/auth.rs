use crate::{
    config::Config,
    error,
    input::ConsoleInput,
    management::TokenManager,
    spotify::auth::{SpotifyAuth, authorize_interactive, authorize_with_callback},
    success,
};

/// Runs the authorization flow and caches the resulting token.
///
/// By default a local callback server on the redirect URI receives the code.
/// With `manual` the user pastes the redirect URL into the terminal instead.
pub async fn auth(config: &Config, manual: bool) {
    let auth = SpotifyAuth::new(config);

    let token = if manual {
        authorize_interactive(&auth, &mut ConsoleInput::stdin()).await
    } else {
        authorize_with_callback(&auth).await
    };

    match token {
        Ok(token) => {
            let token_manager = TokenManager::new(token);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
            }

            success!("Authentication successful!");
        }
        Err(e) => error!("Error authenticating with Spotify: {}", e),
    }
}
