//! pixlist - Spotify playlist manager library
//!
//! This library provides everything behind the `pixlist` command line tool:
//! an authenticated Spotify transport, complete (paginated) playlist fetches,
//! batched playlist mutations and a playlist editor that reorders, shuffles
//! and rewrites playlists while keeping a local snapshot in view.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared by every layer
//! - `management` - Playlist editor, snapshots and credential storage
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use pixlist::{management::{CredentialStore, PlaylistEditor}, spotify::Transport};
//!
//! #[tokio::main]
//! async fn main() -> pixlist::Res<()> {
//!     pixlist::config::load_env().await?;
//!     let session = CredentialStore::default_location().session().await?;
//!     let mut editor = PlaylistEditor::load(Transport::from_config(Some(session)), "37i9dQZF1DXcBWIGoYBM5M").await?;
//!     let applied = editor.move_item(0, 2)?;
//!     editor.persist(applied).await.into_result()?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// A convenient Result type alias for the top-level command plumbing.
///
/// Library functions return [`Result`] with the typed [`Error`]; commands
/// that mix several error sources box them into this alias.
///
/// # Example
///
/// ```
/// use pixlist::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Fetched {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green checkmark once an operation is done.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with code 1.
///
/// Only for failures the command cannot continue after; code following the
/// macro never runs.
///
/// ```
/// error!("Cannot load environment. Err: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr for problems the command survives,
/// such as a reorder that was shown locally but not persisted.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
