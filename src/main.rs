use std::sync::Arc;

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use pixlist::{
    cli, config, error, management::SortKey, spotify::catalog::SearchKind, types::PkceToken,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Forget the stored access token
    Logout,

    /// Show the account behind the stored token
    Whoami,

    /// List your playlists
    Playlists,

    /// Inspect and edit a playlist
    #[command(subcommand)]
    Playlist(PlaylistCommand),

    /// Search the catalog
    Search(SearchOptions),

    /// Artist details and albums
    Artist(ArtistOptions),

    /// Album details and tracks
    Album(AlbumOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistCommand {
    /// Show every track of a playlist
    Show { playlist_id: String },

    /// Create a private (or public) playlist
    Create {
        name: String,
        #[clap(long)]
        public: bool,
    },

    /// Remove a playlist from your library
    Delete { playlist_id: String },

    /// Append tracks and/or whole albums, in the given order
    Add(AddOptions),

    /// Remove every occurrence of a track
    Remove { playlist_id: String, track: String },

    /// Move the track at FROM so it ends up at TO (0-based positions)
    Move {
        playlist_id: String,
        from: usize,
        to: usize,
    },

    /// Shuffle the playlist (rewrites the whole playlist)
    Shuffle(RewriteOptions),

    /// Sort the playlist (rewrites the whole playlist)
    Sort {
        #[clap(flatten)]
        rewrite: RewriteOptions,
        #[clap(long, value_enum, default_value_t = SortBy::Name)]
        by: SortBy,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AddOptions {
    /// Playlist to append to
    #[clap(long, conflicts_with = "new", required_unless_present = "new")]
    to: Option<String>,

    /// Create a new private playlist with this name and append to it
    #[clap(long)]
    new: Option<String>,

    /// Album whose tracks are appended; can be repeated
    #[clap(long = "album")]
    albums: Vec<String>,

    /// Track URIs, open.spotify.com links or ids
    tracks: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RewriteOptions {
    playlist_id: String,

    /// Re-fetch the playlist afterwards and compare with the saved order
    #[clap(long)]
    verify: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortBy {
    Name,
    Artist,
    Duration,
}

impl From<SortBy> for SortKey {
    fn from(by: SortBy) -> Self {
        match by {
            SortBy::Name => SortKey::Name,
            SortBy::Artist => SortKey::Artist,
            SortBy::Duration => SortKey::Duration,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    query: String,

    /// What to search for: artist, album or track
    #[clap(long = "type", default_value = "track", value_parser = parse_search_kind)]
    kind: SearchKind,
}

fn parse_search_kind(s: &str) -> Result<SearchKind, String> {
    s.parse()
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    artist_id: String,

    /// Leave out albums with "live" in their name
    #[clap(long)]
    exclude_live: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumOptions {
    album_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PIXLIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Logout => cli::logout().await,
        Command::Whoami => cli::whoami().await,
        Command::Playlists => cli::list_playlists().await,

        Command::Playlist(cmd) => match cmd {
            PlaylistCommand::Show { playlist_id } => cli::show_playlist(playlist_id).await,
            PlaylistCommand::Create { name, public } => cli::create_playlist(name, public).await,
            PlaylistCommand::Delete { playlist_id } => cli::delete_playlist(playlist_id).await,
            PlaylistCommand::Add(opt) => {
                cli::add_tracks(opt.to, opt.new, opt.tracks, opt.albums).await
            }
            PlaylistCommand::Remove { playlist_id, track } => {
                cli::remove_track(playlist_id, track).await
            }
            PlaylistCommand::Move {
                playlist_id,
                from,
                to,
            } => cli::move_track(playlist_id, from, to).await,
            PlaylistCommand::Shuffle(opt) => cli::shuffle_playlist(opt.playlist_id, opt.verify).await,
            PlaylistCommand::Sort { rewrite, by } => {
                cli::sort_playlist(rewrite.playlist_id, by.into(), rewrite.verify).await
            }
        },

        Command::Search(opt) => cli::search(opt.query, opt.kind).await,
        Command::Artist(opt) => cli::artist(opt.artist_id, opt.exclude_live).await,
        Command::Album(opt) => cli::album(opt.album_id).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
