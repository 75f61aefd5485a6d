use tabled::Table;

use crate::{
    error,
    error::Error,
    info,
    management::{Applied, Persisted, PlaylistEditor, SortKey},
    spotify::{Transport, catalog, playlists},
    success,
    types::PlaylistTableRow,
    utils, warning,
};

use super::{authenticated_transport, fail};

pub async fn list_playlists() {
    let transport = authenticated_transport().await;

    let pb = utils::spinner("Fetching playlists...");
    let result = playlists::user_playlists(&transport).await;
    pb.finish_and_clear();

    match result {
        Ok(list) => {
            let rows: Vec<PlaylistTableRow> = list
                .into_iter()
                .map(|p| PlaylistTableRow {
                    name: p.name,
                    tracks: p
                        .tracks
                        .map(|t| t.total.to_string())
                        .unwrap_or_default(),
                    id: p.id,
                })
                .collect();

            println!("{}", Table::new(rows));
        }
        Err(e) => fail("Failed to load playlists", e),
    }
}

pub async fn show_playlist(playlist_id: String) {
    let transport = authenticated_transport().await;
    let editor = load_editor(transport.clone(), &playlist_id).await;

    match playlists::info(&transport, &playlist_id).await {
        Ok(info) => {
            info!("{}", info.name);
            if let Some(description) = info.description.filter(|d| !d.is_empty()) {
                println!("{}", description);
            }
        }
        Err(e) => warning!("Failed to load playlist details: {}", e),
    }

    print_editor(&editor);
}

pub async fn create_playlist(name: String, public: bool) {
    let transport = authenticated_transport().await;
    match create(&transport, &name, public).await {
        Ok(id) => success!("Playlist {} created with id {}", name, id),
        Err(e) => fail("Failed to create playlist", e),
    }
}

pub async fn delete_playlist(playlist_id: String) {
    let transport = authenticated_transport().await;
    match playlists::delete(&transport, &playlist_id).await {
        Ok(()) => success!("Playlist {} removed from your library", playlist_id),
        Err(e) => fail("Failed to delete playlist", e),
    }
}

/// Appends tracks and/or whole albums to an existing or a new playlist.
pub async fn add_tracks(
    target: Option<String>,
    new_name: Option<String>,
    tracks: Vec<String>,
    albums: Vec<String>,
) {
    let transport = authenticated_transport().await;

    let mut uris: Vec<String> = Vec::new();
    for track in &tracks {
        match utils::normalize_track_uri(track) {
            Some(uri) => uris.push(uri),
            None => error!("Not a track URI, link or id: {}", track),
        }
    }

    for album_id in &albums {
        match catalog::album_tracks(&transport, album_id).await {
            Ok(album_tracks) => uris.extend(album_tracks.into_iter().map(|t| t.uri)),
            Err(e) => fail(&format!("Failed to load tracks of album {album_id}"), e),
        }
    }

    if uris.is_empty() {
        warning!("Nothing to add.");
        return;
    }

    let playlist_id = match (target, new_name) {
        (Some(id), _) => id,
        (None, Some(name)) => match create(&transport, &name, false).await {
            Ok(id) => {
                success!("Playlist {} created with id {}", name, id);
                id
            }
            Err(e) => fail("Failed to create playlist", e),
        },
        (None, None) => error!("Pass --to <PLAYLIST_ID> or --new <NAME>."),
    };

    let pb = utils::spinner(format!("Adding {} tracks...", uris.len()));
    let result = playlists::add_items(&transport, &playlist_id, &uris).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => success!("Added {} tracks to {}", uris.len(), playlist_id),
        Err(Error::PartialBatch {
            applied_chunks,
            total_chunks,
            applied_uris,
            source,
        }) => error!(
            "Added {} of {} tracks ({}/{} batches) before Spotify failed: {}\nThe added tracks stay in the playlist; add the remaining ones again.",
            applied_uris,
            uris.len(),
            applied_chunks,
            total_chunks,
            source
        ),
        Err(e) => fail("Failed to add tracks", e),
    }
}

pub async fn remove_track(playlist_id: String, track: String) {
    let Some(uri) = utils::normalize_track_uri(&track) else {
        error!("Not a track URI, link or id: {}", track);
    };

    let transport = authenticated_transport().await;
    let mut editor = load_editor(transport, &playlist_id).await;

    match editor.remove(&uri).await {
        Ok(0) => warning!("{} was not part of the loaded playlist", uri),
        Ok(removed) => success!(
            "Removed {} occurrence(s) of {}, {} tracks left",
            removed,
            uri,
            editor.snapshot().len()
        ),
        Err(e) => fail("Failed to remove track", e),
    }
}

pub async fn move_track(playlist_id: String, from: usize, to: usize) {
    let transport = authenticated_transport().await;
    let mut editor = load_editor(transport, &playlist_id).await;

    let applied = match editor.move_item(from, to) {
        Ok(applied) => applied,
        Err(e) => fail("Cannot move track", e),
    };

    if applied.is_noop() {
        info!("Track {} is already at position {}", from, to);
        return;
    }

    persist_and_report(&mut editor, applied, false).await;
}

pub async fn shuffle_playlist(playlist_id: String, verify: bool) {
    let transport = authenticated_transport().await;
    let mut editor = load_editor(transport, &playlist_id).await;

    let applied = editor.shuffle(&mut rand::rng());
    if applied.is_noop() {
        info!("Nothing to shuffle.");
        return;
    }

    persist_and_report(&mut editor, applied, verify).await;
}

pub async fn sort_playlist(playlist_id: String, key: SortKey, verify: bool) {
    let transport = authenticated_transport().await;
    let mut editor = load_editor(transport, &playlist_id).await;

    let applied = match editor.sort_by(key) {
        Ok(applied) => applied,
        Err(e) => fail("Cannot sort playlist", e),
    };

    if applied.is_noop() {
        info!("Playlist is already sorted.");
        return;
    }

    persist_and_report(&mut editor, applied, verify).await;
}

async fn create(transport: &Transport, name: &str, public: bool) -> crate::Result<String> {
    let user = playlists::current_user(transport).await?;
    let playlist = playlists::create(transport, &user.id, name, public).await?;
    Ok(playlist.id)
}

async fn load_editor(transport: Transport, playlist_id: &str) -> PlaylistEditor {
    let pb = utils::spinner("Fetching playlist tracks...");
    let result = PlaylistEditor::load(transport, playlist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(editor) => editor,
        Err(e) => fail("Failed to load playlist", e),
    }
}

fn print_editor(editor: &PlaylistEditor) {
    let snapshot = editor.snapshot();
    println!("{}", Table::new(utils::track_rows(snapshot.items())));
    info!(
        "{} tracks - {}",
        snapshot.len(),
        utils::format_duration(snapshot.total_duration_ms())
    );
}

/// Shows the new local order, pushes it, and explains any resulting desync.
async fn persist_and_report(editor: &mut PlaylistEditor, applied: Applied, verify: bool) {
    let requests = applied
        .strategy()
        .map(|s| s.request_count())
        .unwrap_or_default();

    print_editor(editor);

    let pb = utils::spinner(format!("Saving order ({} requests)...", requests));
    let persisted = editor.persist(applied).await;
    pb.finish_and_clear();

    match persisted {
        Persisted::Unchanged => info!("Nothing changed."),
        Persisted::Confirmed => {
            success!("Order saved.");
            if verify {
                verify_remote(editor).await;
            }
        }
        Persisted::Failed(e) => {
            if e.leaves_desync() {
                warning!(
                    "Spotify only applied part of the change. The order above is NOT what the playlist holds now."
                );
            } else {
                warning!("The order above was not saved.");
            }
            fail(
                "Failed to save order (run pixlist playlist show to see the remote state)",
                e,
            )
        }
    }
}

async fn verify_remote(editor: &mut PlaylistEditor) {
    let expected = editor.snapshot().uris();

    let pb = utils::spinner("Verifying remote order...");
    let result = editor.resync().await;
    pb.finish_and_clear();

    match result {
        Ok(()) if editor.snapshot().uris() == expected => {
            success!("Remote playlist matches the saved order.")
        }
        Ok(()) => warning!(
            "Remote playlist differs from the saved order ({} vs {} tracks); it may have been changed elsewhere.",
            editor.snapshot().len(),
            expected.len()
        ),
        Err(e) => warning!("Could not verify remote order: {}", e),
    }
}
