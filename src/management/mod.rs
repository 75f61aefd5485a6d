mod credentials;
mod editor;
mod reorder;
mod snapshot;

pub use credentials::CredentialStore;
pub use editor::{PlaylistEditor, SortKey};
pub use reorder::{Applied, Persisted, ReorderState, ReorderStrategy};
pub use snapshot::{PlaylistSnapshot, validate_permutation};
