use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config,
    error::{Error, Result},
    management::CredentialStore,
    server::start_api_server,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// Longest time `auth` waits for the browser to hit the callback.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the authorization-code flow with PKCE and stores the resulting token.
///
/// 1. Generates the PKCE code verifier and its SHA256 challenge
/// 2. Starts the local callback server on `SERVER_ADDRESS`
/// 3. Opens the Spotify authorization URL in the browser
/// 4. Waits for the callback handler to exchange the code
/// 5. Persists the token in the credential store
///
/// No refresh token is kept: once the access token expires, API calls fail
/// with [`Error::Unauthorized`] and the user logs in again.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>, store: &CredentialStore) -> Result<Token> {
    let client_id = config::spotify_client_id()?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let auth_url = authorization_url(&client_id, &code_challenge)?;

    let server_state = Arc::clone(&shared_state);
    let mut server = tokio::spawn(async move { start_api_server(server_state).await });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = tokio::select! {
        token = wait_for_token(shared_state) => token,
        served = &mut server => match served {
            Ok(Err(e)) => return Err(e),
            Ok(Ok(())) => None,
            Err(e) => return Err(Error::Server(e.to_string())),
        },
    };
    server.abort();

    match token {
        Some(t) => {
            store.persist(&t).await?;
            Ok(t)
        }
        None => Err(Error::Server(
            "Authentication failed or timed out".to_string(),
        )),
    }
}

/// Builds the Spotify authorization URL for the PKCE flow.
pub fn authorization_url(client_id: &str, code_challenge: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.to_string()),
            ("response_type", "code".to_string()),
            ("redirect_uri", config::spotify_redirect_uri()),
            ("code_challenge", code_challenge.to_string()),
            ("code_challenge_method", "S256".to_string()),
            ("scope", config::spotify_scope()),
        ],
    )
    .map_err(|e| Error::Server(format!("Invalid authorization URL: {e}")))?;

    Ok(url.into())
}

/// Polls the shared state once per second until the callback stored a token.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.clone()) {
            return Some(token);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code and the PKCE verifier for an access token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: TokenResponse = res.json().await?;

    Ok(Token {
        access_token: json.access_token,
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
