use tabled::Table;

use crate::{
    info,
    spotify::catalog,
    types::{Album, AlbumTableRow, TrackTableRow},
    utils,
};

use super::{authenticated_transport, fail};

pub async fn artist(artist_id: String, exclude_live: bool) {
    let transport = authenticated_transport().await;

    let artist = match catalog::artist(&transport, &artist_id).await {
        Ok(artist) => artist,
        Err(e) => fail("Failed to load artist", e),
    };

    info!(
        "{} - {} followers - popularity {}",
        artist.name,
        artist.followers.map(|f| f.total).unwrap_or_default(),
        artist.popularity.unwrap_or_default()
    );
    if !artist.genres.is_empty() {
        println!("{}", artist.genres.join(", "));
    }

    let pb = utils::spinner("Fetching albums...");
    let result = catalog::artist_albums(&transport, &artist_id, !exclude_live).await;
    pb.finish_and_clear();

    match result {
        Ok(albums) => println!("{}", Table::new(album_rows(albums))),
        Err(e) => fail("Failed to load albums", e),
    }
}

pub async fn album(album_id: String) {
    let transport = authenticated_transport().await;

    let details = match catalog::album(&transport, &album_id).await {
        Ok(details) => details,
        Err(e) => fail("Failed to load album", e),
    };

    let tracks = match catalog::album_tracks(&transport, &album_id).await {
        Ok(tracks) => tracks,
        Err(e) => fail("Failed to load album tracks", e),
    };

    let total_ms: u64 = tracks.iter().map(|t| t.duration_ms).sum();
    let rows: Vec<TrackTableRow> = tracks
        .into_iter()
        .enumerate()
        .map(|(position, t)| TrackTableRow {
            position,
            artists: t.artist_names(),
            album: details.name.clone(),
            duration: utils::format_duration(t.duration_ms),
            name: t.name,
        })
        .collect();

    info!(
        "{} - {} ({})",
        details.name,
        details
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        details.release_date
    );
    if let Some(label) = details.label.as_deref().filter(|l| !l.is_empty()) {
        println!("{}", label);
    }

    println!("{}", Table::new(rows));
    info!(
        "{} tracks - {}",
        details.tracks.total.unwrap_or_default(),
        utils::format_duration(total_ms)
    );
}

pub(super) fn album_rows(albums: Vec<Album>) -> Vec<AlbumTableRow> {
    albums
        .into_iter()
        .map(|a| AlbumTableRow {
            date: a.release_date,
            name: a.name,
            artists: a
                .artists
                .first()
                .map(|artist| artist.name.clone())
                .unwrap_or_default(),
            album_type: a.album_type,
            id: a.id,
        })
        .collect()
}
