use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::Config,
    info,
    input::{InputProvider, Prompt},
    management::TokenManager,
    server::start_callback_server,
    spotify::SpotifyClient,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// How long the callback flow waits for the browser to come back.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Client credentials and endpoints of the authorization code flow.
#[derive(Clone)]
pub struct SpotifyAuth {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl SpotifyAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            scope: config.spotify_scope.clone(),
            auth_url: config.spotify_auth_url.clone(),
            token_url: config.spotify_token_url.clone(),
        }
    }

    /// Builds the URL the user visits to grant access.
    pub fn authorize_url(&self, code_challenge: &str, state: &str) -> Res<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
                ("state", state),
                ("scope", self.scope.as_str()),
            ],
        )
        .map_err(|e| Error::Auth(format!("invalid authorize URL {}: {}", self.auth_url, e)))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Res<Token> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("code_verifier", verifier),
        ])
        .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Res<Token> {
        if refresh_token.is_empty() {
            return Err(Error::Auth("no refresh token cached".to_string()));
        }

        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Res<Token> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token endpoint responded with {}: {}",
                status,
                body.trim()
            )));
        }

        let json = response.json::<TokenResponse>().await?;

        Ok(Token {
            access_token: json.access_token,
            refresh_token: json.refresh_token.unwrap_or_default(),
            scope: json.scope,
            expires_in: json.expires_in,
            obtained_at: Utc::now().timestamp().max(0) as u64,
        })
    }

    /// The `host:port` the redirect URI points at, for the callback server.
    pub fn redirect_address(&self) -> Res<String> {
        let url = self.redirect_url()?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::Auth(format!("redirect URI {} has no host", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::Auth(format!("redirect URI {} has no port", url)))?;
        Ok(format!("{}:{}", host, port))
    }

    pub fn redirect_path(&self) -> Res<String> {
        Ok(self.redirect_url()?.path().to_string())
    }

    fn redirect_url(&self) -> Res<Url> {
        Url::parse(&self.redirect_uri)
            .map_err(|e| Error::Auth(format!("invalid redirect URI {}: {}", self.redirect_uri, e)))
    }
}

/// Starts a new authorization with a fresh PKCE verifier and state.
pub fn new_authorization() -> PkceToken {
    PkceToken {
        code_verifier: utils::generate_code_verifier(),
        state: utils::generate_state(),
        code: None,
    }
}

/// Returns an authenticated client.
///
/// A cached token is used when present and refreshed if it is about to
/// expire. Otherwise the user is sent through the authorization flow and asked
/// to paste back the URL the browser was redirected to.
pub async fn authenticate<I: InputProvider>(config: &Config, input: &mut I) -> Res<SpotifyClient> {
    let auth = SpotifyAuth::new(config);

    let cached = match TokenManager::load().await {
        Ok(mut tokens) if tokens.is_expired() => match tokens.refresh(&auth).await {
            Ok(()) => Some(tokens),
            Err(e) => {
                warning!("Cached Spotify token could not be refreshed: {}", e);
                None
            }
        },
        Ok(tokens) => Some(tokens),
        Err(_) => None,
    };

    let tokens = match cached {
        Some(tokens) => tokens,
        None => {
            let tokens = TokenManager::new(authorize_interactive(&auth, input).await?);
            if let Err(e) = tokens.persist().await {
                warning!("Failed to save token to cache: {}", e);
            }
            tokens
        }
    };

    Ok(SpotifyClient::with_auth(&config.spotify_api_url, auth, tokens))
}

/// Authorization by pasting the redirect URL back into the input provider.
pub async fn authorize_interactive<I: InputProvider>(
    auth: &SpotifyAuth,
    input: &mut I,
) -> Res<Token> {
    let pending = new_authorization();
    let auth_url = auth.authorize_url(
        &utils::generate_code_challenge(&pending.code_verifier),
        &pending.state,
    )?;

    info!(
        "Please navigate to the following URL to authorize the application:\n{}",
        auth_url
    );
    let _ = webbrowser::open(&auth_url);

    redeem_redirect(auth, &pending, input).await
}

/// Asks for the redirect URL of `pending` and exchanges its code.
///
/// A pasted URL must carry the `state` of `pending`; a bare code is accepted
/// as is.
pub async fn redeem_redirect<I: InputProvider>(
    auth: &SpotifyAuth,
    pending: &PkceToken,
    input: &mut I,
) -> Res<Token> {
    let response = utils::parse_response_code(&input.ask(Prompt::RedirectUrl)?)?;
    if let Some(state) = &response.state {
        if *state != pending.state {
            return Err(Error::Auth("state mismatch in redirect URL".to_string()));
        }
    }

    auth.exchange_code(&response.code, &pending.code_verifier).await
}

/// Authorization through a local callback server on the redirect URI.
///
/// Opens the authorize URL in the default browser and waits up to two minutes
/// for Spotify to call back with a code.
pub async fn authorize_with_callback(auth: &SpotifyAuth) -> Res<Token> {
    let pending = new_authorization();
    let auth_url = auth.authorize_url(
        &utils::generate_code_challenge(&pending.code_verifier),
        &pending.state,
    )?;

    let shared_state = Arc::new(Mutex::new(Some(pending.clone())));
    let server = start_callback_server(
        &auth.redirect_address()?,
        &auth.redirect_path()?,
        Arc::clone(&shared_state),
    )
    .await?;

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for authorization in the browser...");
    }

    let code = wait_for_code(shared_state, CALLBACK_TIMEOUT).await;
    server.abort();

    let code = code.ok_or_else(|| Error::Auth("authorization failed or timed out".to_string()))?;
    auth.exchange_code(&code, &pending.code_verifier).await
}

/// Polls the shared state once a second until the callback stored a code.
async fn wait_for_code(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<String> {
    let start = std::time::Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(code) = lock.as_ref().and_then(|p| p.code.clone()) {
            return Some(code);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
