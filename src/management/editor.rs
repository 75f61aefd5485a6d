use std::cmp::Ordering;

use rand::Rng;
use tracing::{debug, warn};

use crate::{
    error::Result,
    management::{
        PlaylistSnapshot,
        reorder::{Applied, Persisted, ReorderState, ReorderStrategy},
    },
    spotify::{Transport, playlists},
    types::PlaylistItem,
    utils,
};

/// Sort keys offered by [`PlaylistEditor::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Artist,
    Duration,
}

/// Edits one playlist through its local snapshot.
///
/// Every reorder is two-phase: the `move_item`, `shuffle`, `set_order` and
/// `sort_by` calls change the snapshot right away and return an [`Applied`];
/// [`PlaylistEditor::persist`] then pushes it to Spotify. A failed push is
/// not rolled back locally. Call [`PlaylistEditor::resync`] to get back in
/// line with the remote playlist.
///
/// Methods take `&mut self`, so one editor never runs two mutations at once.
pub struct PlaylistEditor {
    transport: Transport,
    snapshot: PlaylistSnapshot,
    state: ReorderState,
}

impl PlaylistEditor {
    /// Fetches the whole playlist and opens an editor on it.
    pub async fn load(transport: Transport, playlist_id: &str) -> Result<Self> {
        let items = playlists::fetch_all(&transport, playlist_id).await?;
        debug!(playlist_id, tracks = items.len(), "snapshot loaded");

        Ok(Self::from_snapshot(
            transport,
            PlaylistSnapshot::new(playlist_id, items),
        ))
    }

    pub fn from_snapshot(transport: Transport, snapshot: PlaylistSnapshot) -> Self {
        Self {
            transport,
            snapshot,
            state: ReorderState::Idle,
        }
    }

    pub fn snapshot(&self) -> &PlaylistSnapshot {
        &self.snapshot
    }

    pub fn items(&self) -> &[PlaylistItem] {
        self.snapshot.items()
    }

    pub fn state(&self) -> ReorderState {
        self.state
    }

    /// Moves the item at `from` to index `to` (drag and drop).
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<Applied> {
        if from == to {
            // still reject indices that do not exist
            self.snapshot.move_item(from, to)?;
            return Ok(self.plan(None));
        }

        self.snapshot.move_item(from, to)?;
        Ok(self.plan(ReorderStrategy::native_move(from, to)))
    }

    /// Fisher–Yates shuffle of the whole playlist.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) -> Applied {
        if self.snapshot.len() <= 1 {
            return self.plan(None);
        }

        utils::shuffle(self.snapshot.items_mut(), rng);
        let uris = self.snapshot.uris();
        self.plan(Some(ReorderStrategy::FullRewrite { uris }))
    }

    /// Puts the playlist in an arbitrary order: position `i` receives the
    /// item that was at `order[i]`.
    pub fn set_order(&mut self, order: &[usize]) -> Result<Applied> {
        self.snapshot.apply_permutation(order)?;

        let unchanged = order.iter().enumerate().all(|(i, &o)| i == o);
        if unchanged {
            return Ok(self.plan(None));
        }

        let uris = self.snapshot.uris();
        Ok(self.plan(Some(ReorderStrategy::FullRewrite { uris })))
    }

    /// Stable sort of the playlist. Unresolvable entries go last.
    pub fn sort_by(&mut self, key: SortKey) -> Result<Applied> {
        let items = self.snapshot.items();
        let mut order: Vec<usize> = (0..items.len()).collect();

        order.sort_by(|&a, &b| {
            match (items[a].track.as_ref(), items[b].track.as_ref()) {
                (Some(ta), Some(tb)) => match key {
                    SortKey::Name => ta.name.to_lowercase().cmp(&tb.name.to_lowercase()),
                    SortKey::Artist => ta
                        .artist_names()
                        .to_lowercase()
                        .cmp(&tb.artist_names().to_lowercase()),
                    SortKey::Duration => ta.duration_ms.cmp(&tb.duration_ms),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });

        self.set_order(&order)
    }

    fn plan(&mut self, strategy: Option<ReorderStrategy>) -> Applied {
        self.state = if strategy.is_some() {
            ReorderState::OptimisticLocalUpdate
        } else {
            ReorderState::Idle
        };
        Applied::new(strategy)
    }

    /// Pushes a local reorder to Spotify.
    pub async fn persist(&mut self, applied: Applied) -> Persisted {
        let Some(strategy) = applied.into_strategy() else {
            self.state = ReorderState::Idle;
            return Persisted::Unchanged;
        };

        self.state = ReorderState::RemoteMutationInFlight;
        let playlist_id = self.snapshot.playlist_id().to_string();

        match strategy.apply(&self.transport, &playlist_id).await {
            Ok(()) => {
                if matches!(strategy, ReorderStrategy::FullRewrite { .. }) {
                    self.snapshot.hoist_unresolved();
                }
                self.state = ReorderState::Confirmed;
                debug!(playlist_id, "reorder confirmed");
                Persisted::Confirmed
            }
            Err(e) => {
                self.state = ReorderState::Failed;
                warn!(playlist_id, desync = e.leaves_desync(), "reorder failed: {}", e);
                Persisted::Failed(e)
            }
        }
    }

    /// Removes every occurrence of `uri`, remotely first, then locally.
    pub async fn remove(&mut self, uri: &str) -> Result<usize> {
        playlists::remove_item(&self.transport, self.snapshot.playlist_id(), uri).await?;
        Ok(self.snapshot.remove_uri(uri))
    }

    /// Appends `uris` in order, then reloads the snapshot to pick up the
    /// metadata of the new tracks.
    pub async fn add(&mut self, uris: &[String]) -> Result<()> {
        playlists::add_items(&self.transport, self.snapshot.playlist_id(), uris).await?;
        self.resync().await
    }

    /// Replaces the snapshot with a fresh fetch-all.
    pub async fn resync(&mut self) -> Result<()> {
        let playlist_id = self.snapshot.playlist_id().to_string();
        let items = playlists::fetch_all(&self.transport, &playlist_id).await?;
        self.snapshot = PlaylistSnapshot::new(playlist_id, items);
        self.state = ReorderState::Idle;
        Ok(())
    }
}
