//! # CLI Module
//!
//! The user-facing side of pixlist. Each command loads the stored session,
//! calls into the Spotify layer or the playlist editor, and renders the
//! result as tables and coloured status lines.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Runs the OAuth 2.0 PKCE login and stores the token
//! - [`logout`] - Forgets the stored token
//! - [`whoami`] - Shows the account the token belongs to
//!
//! ### Playlists
//!
//! - [`list_playlists`] - Every playlist of the user
//! - [`show_playlist`] - All tracks of a playlist, fetched page by page
//! - [`create_playlist`], [`delete_playlist`]
//! - [`add_tracks`], [`remove_track`]
//! - [`move_track`], [`shuffle_playlist`], [`sort_playlist`]
//!
//! ### Catalog
//!
//! - [`search`] - Artists, albums or tracks matching a query
//! - [`artist`] - Artist details and discography
//! - [`album`] - Album details and track listing
//!
//! ## Reorders and Desync
//!
//! Reorders are shown first and pushed to Spotify afterwards. When the push
//! fails the command prints the local order it meant to write, says whether
//! the remote playlist may have been changed halfway, and points to
//! `pixlist playlist show` to see the real remote state. Nothing is retried.
//!
//! ```bash
//! pixlist auth
//! pixlist playlists
//! pixlist playlist show 37i9dQZF1DXcBWIGoYBM5M
//! pixlist playlist move 37i9dQZF1DXcBWIGoYBM5M 0 2
//! pixlist playlist shuffle 37i9dQZF1DXcBWIGoYBM5M --verify
//! ```

mod albums;
mod auth;
mod playlist;
mod search;

pub use albums::{album, artist};
pub use auth::{auth, logout, whoami};
pub use playlist::{
    add_tracks, create_playlist, delete_playlist, list_playlists, move_track, remove_track,
    show_playlist, shuffle_playlist, sort_playlist,
};
pub use search::search;

use crate::{
    error,
    error::Error,
    management::CredentialStore,
    spotify::Transport,
};

/// Transport carrying the stored session. Exits when nobody is logged in.
async fn authenticated_transport() -> Transport {
    match CredentialStore::default_location().session().await {
        Ok(session) => Transport::from_config(Some(session)),
        Err(e) => error!("{}", e),
    }
}

/// Reports a failed command and exits.
fn fail(context: &str, e: Error) -> ! {
    if e.is_unauthorized() {
        error!("{}: {}\nYour session may have expired, run pixlist auth.", context, e)
    }
    error!("{}: {}", context, e)
}
