use std::collections::HashSet;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    spotify::Transport,
    types::{
        AddTracksRequest, CreatePlaylistRequest, Page, Playlist, PlaylistInfo, PlaylistItem,
        RemoveTracksRequest, ReorderTracksRequest, SnapshotResponse, TrackUri, User,
    },
};

/// Largest page Spotify serves for playlist tracks.
pub const PAGE_SIZE: usize = 100;

/// Largest number of URIs Spotify accepts in a single add request.
pub const MAX_BATCH: usize = 100;

/// Page size of the `/me/playlists` endpoint.
pub const PLAYLISTS_PAGE_SIZE: usize = 50;

/// Retrieves one page of a playlist's tracks.
pub async fn fetch_page(
    transport: &Transport,
    playlist_id: &str,
    offset: usize,
    limit: usize,
) -> Result<Page<PlaylistItem>> {
    transport
        .get(
            &format!("/playlists/{playlist_id}/tracks"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
}

/// Retrieves every item of a playlist in remote order.
///
/// Pages of [`PAGE_SIZE`] are requested one after another; the offset moves
/// by the number of items actually returned. The loop ends when Spotify
/// reports no `next` page or a page comes back short.
///
/// # Errors
///
/// Any failing page aborts the whole fetch. No partial result is returned.
pub async fn fetch_all(transport: &Transport, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
    fetch_all_pages(transport, &format!("/playlists/{playlist_id}/tracks"), PAGE_SIZE).await
}

/// Offset/limit pagination loop shared by every "fetch all" operation.
pub async fn fetch_all_pages<T: DeserializeOwned>(
    transport: &Transport,
    path: &str,
    page_size: usize,
) -> Result<Vec<T>> {
    let mut offset = 0;
    let mut all_items: Vec<T> = Vec::new();

    loop {
        let page: Page<T> = transport
            .get(
                path,
                &[
                    ("offset", offset.to_string()),
                    ("limit", page_size.to_string()),
                ],
            )
            .await?;

        let received = page.items.len();
        debug!(path, offset, received, total = ?page.total, "fetched page");

        all_items.extend(page.items);
        offset += received;

        if page.next.is_none() || received < page_size {
            break;
        }
    }

    Ok(all_items)
}

/// Appends `uris` to the playlist, in order, in batches of [`MAX_BATCH`].
///
/// Batches are sent strictly one after another since Spotify appends each
/// one at the current end of the playlist.
///
/// # Errors
///
/// A failure on the first batch is returned as is. A failure on a later
/// batch becomes [`Error::PartialBatch`]: the earlier batches stay applied.
pub async fn add_items(transport: &Transport, playlist_id: &str, uris: &[String]) -> Result<()> {
    let path = format!("/playlists/{playlist_id}/tracks");
    let total_chunks = uris.len().div_ceil(MAX_BATCH);
    let mut applied_uris = 0;

    for (index, chunk) in uris.chunks(MAX_BATCH).enumerate() {
        let body = AddTracksRequest {
            uris: chunk.to_vec(),
        };

        match transport.post::<_, SnapshotResponse>(&path, &body).await {
            Ok(_) => {
                applied_uris += chunk.len();
                debug!(playlist_id, chunk = index + 1, total_chunks, "batch added");
            }
            Err(e) if index == 0 => return Err(e),
            Err(e) => {
                warn!(
                    playlist_id,
                    chunk = index + 1,
                    total_chunks,
                    "batch failed after partial application"
                );
                return Err(Error::PartialBatch {
                    applied_chunks: index,
                    total_chunks,
                    applied_uris,
                    source: Box::new(e),
                });
            }
        }
    }

    Ok(())
}

/// Removes a track by URI. Every occurrence goes, as Spotify decides.
pub async fn remove_item(transport: &Transport, playlist_id: &str, uri: &str) -> Result<()> {
    remove_items(transport, playlist_id, &[uri.to_string()]).await
}

/// Removes every given URI with a single delete request.
pub async fn remove_items(transport: &Transport, playlist_id: &str, uris: &[String]) -> Result<()> {
    let body = RemoveTracksRequest {
        tracks: uris
            .iter()
            .map(|uri| TrackUri { uri: uri.clone() })
            .collect(),
    };

    transport
        .delete_with_body::<_, SnapshotResponse>(&format!("/playlists/{playlist_id}/tracks"), &body)
        .await
        .map(|_| ())
}

/// Moves the item at `range_start` in front of the item at `insert_before`.
///
/// Both indices refer to the playlist order before the move.
pub async fn move_range(
    transport: &Transport,
    playlist_id: &str,
    range_start: usize,
    insert_before: usize,
) -> Result<()> {
    let body = ReorderTracksRequest {
        range_start,
        insert_before,
    };

    transport
        .put::<_, SnapshotResponse>(&format!("/playlists/{playlist_id}/tracks"), &body)
        .await
        .map(|_| ())
}

/// Rewrites the playlist so it holds exactly `uris`, in that order.
///
/// Spotify has no "set order" call, so the playlist is emptied with one
/// delete request and then refilled with [`add_items`]. Between both steps the
/// remote playlist is empty.
///
/// Entries without a URI are neither deleted nor re-added, so they end up at
/// the head of the playlist.
///
/// Spotify accepts at most 100 tracks per delete request. With more distinct
/// tracks than that the delete is rejected and nothing changes.
///
/// # Errors
///
/// A failing delete leaves the playlist untouched. A failing refill returns
/// [`Error::RewriteIncomplete`] and nothing is restored.
pub async fn persist_order(transport: &Transport, playlist_id: &str, uris: &[String]) -> Result<()> {
    if uris.is_empty() {
        return Ok(());
    }

    let mut seen = HashSet::new();
    let distinct: Vec<String> = uris
        .iter()
        .filter(|uri| seen.insert(uri.as_str()))
        .cloned()
        .collect();

    remove_items(transport, playlist_id, &distinct).await?;
    debug!(playlist_id, removed = uris.len(), "playlist emptied for rewrite");

    match add_items(transport, playlist_id, uris).await {
        Ok(()) => Ok(()),
        Err(Error::PartialBatch {
            applied_uris,
            source,
            ..
        }) => Err(Error::RewriteIncomplete {
            removed: uris.len(),
            appended: applied_uris,
            source,
        }),
        Err(e) => Err(Error::RewriteIncomplete {
            removed: uris.len(),
            appended: 0,
            source: Box::new(e),
        }),
    }
}

pub async fn current_user(transport: &Transport) -> Result<User> {
    transport.get("/me", &[]).await
}

/// Lists every playlist the current user owns or follows.
pub async fn user_playlists(transport: &Transport) -> Result<Vec<Playlist>> {
    fetch_all_pages(transport, "/me/playlists", PLAYLISTS_PAGE_SIZE).await
}

/// Name, description and images only, without loading the tracks.
pub async fn info(transport: &Transport, playlist_id: &str) -> Result<PlaylistInfo> {
    transport
        .get(
            &format!("/playlists/{playlist_id}"),
            &[("fields", "name,description,images".to_string())],
        )
        .await
}

pub async fn create(transport: &Transport, user_id: &str, name: &str, public: bool) -> Result<Playlist> {
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        public,
    };
    transport
        .post(&format!("/users/{user_id}/playlists"), &body)
        .await
}

/// Spotify has no playlist deletion: unfollowing removes it from the library.
pub async fn delete(transport: &Transport, playlist_id: &str) -> Result<()> {
    transport
        .delete(&format!("/playlists/{playlist_id}/followers"))
        .await
}
