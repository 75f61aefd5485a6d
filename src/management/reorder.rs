use crate::{
    error::{Error, Result},
    spotify::{Transport, playlists},
};

/// How a new order reaches the remote playlist.
///
/// Spotify can move one range in place, but has no call that sets an
/// arbitrary order. Anything beyond a single move goes through
/// [`ReorderStrategy::FullRewrite`], which empties the playlist first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderStrategy {
    /// One positional move. Indices refer to the order before the move.
    NativeMove {
        range_start: usize,
        insert_before: usize,
    },
    /// Delete every track, then add `uris` back in order.
    FullRewrite { uris: Vec<String> },
}

impl ReorderStrategy {
    /// Plans the native move that puts the item at `from` at index `to`.
    ///
    /// Returns `None` when nothing moves.
    pub fn native_move(from: usize, to: usize) -> Option<Self> {
        if from == to {
            return None;
        }

        // Spotify inserts before `insert_before` in the original order, so a
        // move towards the end has to skip over the target slot.
        let insert_before = if to > from { to + 1 } else { to };
        Some(ReorderStrategy::NativeMove {
            range_start: from,
            insert_before,
        })
    }

    /// Number of HTTP requests the strategy needs when everything succeeds.
    pub fn request_count(&self) -> usize {
        match self {
            ReorderStrategy::NativeMove { .. } => 1,
            ReorderStrategy::FullRewrite { uris } if uris.is_empty() => 0,
            ReorderStrategy::FullRewrite { uris } => {
                1 + uris.len().div_ceil(playlists::MAX_BATCH)
            }
        }
    }

    pub async fn apply(&self, transport: &Transport, playlist_id: &str) -> Result<()> {
        match self {
            ReorderStrategy::NativeMove {
                range_start,
                insert_before,
            } => playlists::move_range(transport, playlist_id, *range_start, *insert_before).await,
            ReorderStrategy::FullRewrite { uris } => {
                playlists::persist_order(transport, playlist_id, uris).await
            }
        }
    }
}

/// Where a reorder stands.
///
/// `Idle → OptimisticLocalUpdate → RemoteMutationInFlight → Confirmed | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderState {
    Idle,
    OptimisticLocalUpdate,
    RemoteMutationInFlight,
    Confirmed,
    Failed,
}

/// A reorder already visible in the local snapshot but not yet durable.
///
/// Hand it to `PlaylistEditor::persist` to push it to Spotify.
#[must_use = "a local reorder does nothing remotely until it is persisted"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    strategy: Option<ReorderStrategy>,
}

impl Applied {
    pub(crate) fn new(strategy: Option<ReorderStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Option<&ReorderStrategy> {
        self.strategy.as_ref()
    }

    /// True when the local order did not change and nothing has to be sent.
    pub fn is_noop(&self) -> bool {
        self.strategy.is_none()
    }

    pub(crate) fn into_strategy(self) -> Option<ReorderStrategy> {
        self.strategy
    }
}

/// Outcome of pushing an [`Applied`] reorder to Spotify.
///
/// On `Failed` the local snapshot keeps the optimistic order. Whether the
/// remote playlist changed partially is told by [`Error::leaves_desync`].
#[derive(Debug)]
pub enum Persisted {
    Unchanged,
    Confirmed,
    Failed(Error),
}

impl Persisted {
    pub fn is_ok(&self) -> bool {
        matches!(self, Persisted::Confirmed | Persisted::Unchanged)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Persisted::Unchanged | Persisted::Confirmed => Ok(()),
            Persisted::Failed(e) => Err(e),
        }
    }
}
