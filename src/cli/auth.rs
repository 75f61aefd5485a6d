use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error, info,
    management::CredentialStore,
    spotify::{self, playlists},
    success,
    types::PkceToken,
};

use super::{authenticated_transport, fail};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let store = CredentialStore::default_location();

    info!("Opening the Spotify login page...");
    match spotify::auth::auth(shared_state, &store).await {
        Ok(token) => success!(
            "Authentication successful! Token valid for {} minutes.",
            token.expires_in / 60
        ),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

pub async fn logout() {
    match CredentialStore::default_location().clear().await {
        Ok(true) => success!("Logged out."),
        Ok(false) => info!("Not logged in."),
        Err(e) => error!("Failed to remove stored credential: {}", e),
    }
}

pub async fn whoami() {
    let transport = authenticated_transport().await;
    match playlists::current_user(&transport).await {
        Ok(user) => info!(
            "Logged in as {} ({})",
            user.display_name.as_deref().unwrap_or(&user.id),
            user.id
        ),
        Err(e) => fail("Cannot fetch current user", e),
    }
}
