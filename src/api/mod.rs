//! # API Module
//!
//! HTTP endpoints of the short-lived local server started by `pixlist auth`.
//!
//! - [`callback`] - Receives the authorization code Spotify redirects to and
//!   exchanges it, together with the PKCE code verifier, for an access token.
//! - [`health`] - Reports status and version, handy to check that the
//!   configured `SERVER_ADDRESS` is reachable.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use pixlist::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
