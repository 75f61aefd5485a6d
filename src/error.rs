//! Error types shared by the Spotify client, the playlist editor and the CLI.
//!
//! The variants follow the failure classes a caller has to tell apart:
//!
//! - **Authorization**: [`Error::Unauthorized`] and [`Error::NotLoggedIn`].
//!   The token is never refreshed, the user has to run `pixlist auth` again.
//! - **Remote/network**: [`Error::Remote`] and [`Error::Network`]. Nothing is
//!   retried.
//! - **Partial batch**: [`Error::PartialBatch`] and
//!   [`Error::RewriteIncomplete`]. Part of a multi-request mutation already
//!   reached the remote playlist and was not rolled back.
//!
//! A desync between the local snapshot and the remote playlist is never
//! detected, only reported as possible through [`Error::leaves_desync`].

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The remote API rejected the credential (missing or expired token).
    #[error("Spotify rejected the access token. Please run pixlist auth")]
    Unauthorized,

    /// No credential is stored on this machine.
    #[error("No stored credential found. Please run pixlist auth")]
    NotLoggedIn,

    /// The remote API answered with a non-success status.
    #[error("Spotify API returned {status}: {message}")]
    Remote { status: StatusCode, message: String },

    /// The request never got a usable answer.
    #[error("Request to Spotify failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Some chunks of an append were applied before a later chunk failed.
    #[error(
        "Only {applied_chunks} of {total_chunks} track batches were added ({applied_uris} tracks) before failure: {source}"
    )]
    PartialBatch {
        applied_chunks: usize,
        total_chunks: usize,
        applied_uris: usize,
        #[source]
        source: Box<Error>,
    },

    /// A full rewrite emptied the playlist but could not add every track back.
    #[error(
        "Playlist was emptied ({removed} tracks) but only {appended} tracks were added back: {source}"
    )]
    RewriteIncomplete {
        removed: usize,
        appended: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Index {index} is out of range for a playlist of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid track order: {0}")]
    InvalidOrder(String),

    #[error("{0} must be set")]
    MissingConfig(&'static str),

    #[error("Callback server failed: {0}")]
    Server(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure asks for a new login.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::Unauthorized | Error::NotLoggedIn => true,
            Error::PartialBatch { source, .. } | Error::RewriteIncomplete { source, .. } => {
                source.is_unauthorized()
            }
            _ => false,
        }
    }

    /// True when part of the mutation reached the remote playlist, so the
    /// local snapshot and the remote collection may now disagree.
    pub fn leaves_desync(&self) -> bool {
        matches!(
            self,
            Error::PartialBatch { .. } | Error::RewriteIncomplete { .. }
        )
    }
}
