//! # Spotify Integration Module
//!
//! This module is the only place that talks HTTP to the Spotify Web API. It
//! implements authentication, catalog browsing and every playlist mutation
//! pixlist needs, on top of a single authenticated transport.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Management Layer (PlaylistEditor, CredentialStore)
//!     ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Catalog (search, artists, albums)
//!     └── Playlists (fetch-all, batch add/remove, move, rewrite)
//!          ↓
//! Transport (reqwest + bearer Session)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Transport
//!
//! [`transport`] - [`Transport`] carries an optional [`Session`] injected at
//! construction and attaches it as a bearer token to every request. HTTP 401
//! becomes [`crate::error::Error::Unauthorized`], other failures become
//! `Remote` or `Network` errors. There is no retry, no backoff and no token
//! refresh anywhere in this module.
//!
//! ### Playlists
//!
//! [`playlists`] - The synchronization primitives:
//! - **Fetch-all**: offset/limit pagination with pages of 100, advancing by
//!   the number of items actually returned
//! - **Batch add**: chunks of at most 100 URIs sent strictly in sequence,
//!   reporting partial application when a later chunk fails
//! - **Remove / move**: single delete-by-URI and single positional move
//! - **Rewrite**: delete everything, then re-add in the wanted order
//! - **Management**: list, create, delete (unfollow), playlist info
//!
//! ### Catalog
//!
//! [`catalog`] - Search by artist, album or track, artist details and
//! discography, album details and complete album track listings.
//!
//! ### Authentication
//!
//! [`auth`] - Authorization code flow with PKCE. A local callback server
//! receives the code, which is exchanged together with the code verifier.
//! Only the access token is kept.
//!
//! ## API Coverage
//!
//! - `GET /me`, `GET /me/playlists`
//! - `GET /playlists/{id}`, `GET /playlists/{id}/tracks`
//! - `POST|PUT|DELETE /playlists/{id}/tracks`
//! - `DELETE /playlists/{id}/followers`
//! - `POST /users/{user_id}/playlists`
//! - `GET /search`, `GET /artists/{id}`, `GET /artists/{id}/albums`
//! - `GET /albums/{id}`, `GET /albums/{id}/tracks`
//! - `POST /api/token` (accounts service)
//!
//! ## Usage Patterns
//!
//! ```rust
//! let transport = Transport::from_config(Some(session));
//!
//! let items = spotify::playlists::fetch_all(&transport, playlist_id).await?;
//! spotify::playlists::add_items(&transport, playlist_id, &uris).await?;
//! ```

pub mod auth;
pub mod catalog;
pub mod playlists;
pub mod transport;

pub use transport::{Session, Transport};
