use tabled::Table;

use crate::{
    spotify::catalog::{self, SearchKind, SearchResults},
    types::{ArtistTableRow, TrackTableRow},
    utils, warning,
};

use super::{authenticated_transport, fail};

pub async fn search(query: String, kind: SearchKind) {
    let transport = authenticated_transport().await;

    let pb = utils::spinner(format!("Searching {}s...", kind));
    let result = catalog::search(&transport, &query, kind).await;
    pb.finish_and_clear();

    let results = match result {
        Ok(results) => results,
        Err(e) => fail("Search failed", e),
    };

    if results.is_empty() {
        warning!("No {} found for \"{}\"", kind, query);
        return;
    }

    let table = match results {
        SearchResults::Artists(artists) => Table::new(
            artists
                .into_iter()
                .map(|a| ArtistTableRow {
                    name: a.name,
                    genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
                    id: a.id,
                })
                .collect::<Vec<_>>(),
        ),
        SearchResults::Albums(albums) => Table::new(super::albums::album_rows(albums)),
        SearchResults::Tracks(tracks) => Table::new(
            tracks
                .into_iter()
                .enumerate()
                .map(|(position, t)| TrackTableRow {
                    position,
                    artists: t.artist_names(),
                    album: t.album.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                    duration: utils::format_duration(t.duration_ms),
                    name: format!("{} ({})", t.name, t.uri),
                })
                .collect::<Vec<_>>(),
        ),
    };

    println!("{}", table);
}
