use std::{fmt, str::FromStr};

use crate::{
    config,
    error::Result,
    spotify::{Transport, playlists},
    types::{Album, AlbumDetails, Artist, Page, SearchResponse, Track},
};

/// Number of results requested per search and per artist album listing.
pub const SEARCH_LIMIT: usize = 50;

/// Largest page of the `/albums/{id}/tracks` endpoint.
pub const ALBUM_TRACKS_PAGE_SIZE: usize = 50;

/// Kind of catalog entity a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Artist,
    Album,
    Track,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchKind::Artist => "artist",
            SearchKind::Album => "album",
            SearchKind::Track => "track",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artist" | "artists" => Ok(SearchKind::Artist),
            "album" | "albums" => Ok(SearchKind::Album),
            "track" | "tracks" => Ok(SearchKind::Track),
            other => Err(format!(
                "Invalid search type: '{}'. Valid types: artist, album, track",
                other
            )),
        }
    }
}

/// Search results, one variant per [`SearchKind`].
#[derive(Debug, Clone)]
pub enum SearchResults {
    Artists(Vec<Artist>),
    Albums(Vec<Album>),
    Tracks(Vec<Track>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Artists(v) => v.len(),
            SearchResults::Albums(v) => v.len(),
            SearchResults::Tracks(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub async fn search(transport: &Transport, query: &str, kind: SearchKind) -> Result<SearchResults> {
    let response: SearchResponse = transport
        .get(
            "/search",
            &[
                ("q", query.to_string()),
                ("type", kind.to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
            ],
        )
        .await?;

    let results = match kind {
        SearchKind::Artist => {
            SearchResults::Artists(response.artists.map(|p| p.items).unwrap_or_default())
        }
        SearchKind::Album => {
            SearchResults::Albums(response.albums.map(|p| p.items).unwrap_or_default())
        }
        SearchKind::Track => {
            SearchResults::Tracks(response.tracks.map(|p| p.items).unwrap_or_default())
        }
    };

    Ok(results)
}

pub async fn artist(transport: &Transport, artist_id: &str) -> Result<Artist> {
    transport.get(&format!("/artists/{artist_id}"), &[]).await
}

/// Albums, singles and compilations of an artist in the configured market.
///
/// With `include_live` unset, albums whose name contains "live" (any case)
/// are left out.
pub async fn artist_albums(
    transport: &Transport,
    artist_id: &str,
    include_live: bool,
) -> Result<Vec<Album>> {
    let page: Page<Album> = transport
        .get(
            &format!("/artists/{artist_id}/albums"),
            &[
                ("include_groups", "album,single,compilation".to_string()),
                ("market", config::spotify_market()),
                ("limit", SEARCH_LIMIT.to_string()),
            ],
        )
        .await?;

    Ok(filter_live(page.items, include_live))
}

pub fn filter_live(albums: Vec<Album>, include_live: bool) -> Vec<Album> {
    if include_live {
        return albums;
    }
    albums
        .into_iter()
        .filter(|a| !a.name.to_lowercase().contains("live"))
        .collect()
}

pub async fn album(transport: &Transport, album_id: &str) -> Result<AlbumDetails> {
    transport.get(&format!("/albums/{album_id}"), &[]).await
}

/// Every track of an album in album order, following pagination.
pub async fn album_tracks(transport: &Transport, album_id: &str) -> Result<Vec<Track>> {
    playlists::fetch_all_pages(
        transport,
        &format!("/albums/{album_id}/tracks"),
        ALBUM_TRACKS_PAGE_SIZE,
    )
    .await
}
