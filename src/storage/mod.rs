//! Snapshot persistence for last-seen listings.
//!
//! The snapshot is a pretty-printed UTF-8 JSON array of listings, read once
//! at run start and fully replaced at run end. It is the comparison
//! baseline for new-listing detection.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Listing;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Storage seam for the last-seen listing snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the previous snapshot. Empty when the file is absent or corrupt.
    async fn load(&self) -> Result<Vec<Listing>>;

    /// Replace the snapshot with the given listings.
    async fn save(&self, listings: &[Listing]) -> Result<()>;
}
