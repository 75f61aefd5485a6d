use crate::{
    error::{Error, Result},
    types::PlaylistItem,
};

/// In-memory copy of a playlist's items, in remote order.
///
/// Matches the remote playlist right after a fetch-all. Local edits make it
/// run ahead of the remote until they are persisted, and any out-of-band
/// change makes it stale without notice.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistSnapshot {
    playlist_id: String,
    items: Vec<PlaylistItem>,
}

impl PlaylistSnapshot {
    pub fn new(playlist_id: impl Into<String>, items: Vec<PlaylistItem>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            items,
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// URIs in snapshot order. Entries Spotify could not resolve are skipped.
    pub fn uris(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.uri().map(str::to_string))
            .collect()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.items
            .iter()
            .filter_map(|item| item.track.as_ref())
            .map(|t| t.duration_ms)
            .sum()
    }

    /// Takes the item at `from` out and reinserts it so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;

        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Reorders the items so that position `i` holds the old item `order[i]`.
    pub fn apply_permutation(&mut self, order: &[usize]) -> Result<()> {
        validate_permutation(order, self.items.len())?;

        let mut slots: Vec<Option<PlaylistItem>> = self.items.drain(..).map(Some).collect();
        self.items = order
            .iter()
            .filter_map(|&index| slots[index].take())
            .collect();
        Ok(())
    }

    /// Drops every item with this URI and returns how many went away.
    pub fn remove_uri(&mut self, uri: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.uri() != Some(uri));
        before - self.items.len()
    }

    /// Moves the entries without a URI to the front, keeping the relative
    /// order of both groups. A full rewrite never touches those entries, so
    /// this is where they sit remotely once it went through.
    pub fn hoist_unresolved(&mut self) {
        let (unresolved, resolved): (Vec<_>, Vec<_>) = self
            .items
            .drain(..)
            .partition(|item| item.uri().is_none());
        self.items = unresolved;
        self.items.extend(resolved);
    }

    pub(crate) fn items_mut(&mut self) -> &mut [PlaylistItem] {
        &mut self.items
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

/// Checks that `order` holds every index of `0..len` exactly once.
pub fn validate_permutation(order: &[usize], len: usize) -> Result<()> {
    if order.len() != len {
        return Err(Error::InvalidOrder(format!(
            "expected {} positions, got {}",
            len,
            order.len()
        )));
    }

    let mut seen = vec![false; len];
    for &index in order {
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if seen[index] {
            return Err(Error::InvalidOrder(format!(
                "position {} appears twice",
                index
            )));
        }
        seen[index] = true;
    }

    Ok(())
}
