//! Trait definitions for the placer module.

use async_trait::async_trait;

use super::error::PlacerError;
use super::types::{FilePlacement, PlacedFile};

/// A placer that copies files that are already in the target format.
///
/// Implementations must refuse to overwrite an existing destination and must
/// remove a partially written destination when they fail.
#[async_trait]
pub trait Placer: Send + Sync {
    /// Returns the name of this placer implementation.
    fn name(&self) -> &str;

    /// Copies `placement.source` to `placement.destination`.
    async fn place(&self, placement: FilePlacement) -> Result<PlacedFile, PlacerError>;
}
