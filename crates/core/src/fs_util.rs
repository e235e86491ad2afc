//! Small filesystem helpers shared by the converter, placer and runner.

use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Removes a partially written file. A missing file is not an error.
pub(crate) async fn remove_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial file {}: {}", path.display(), e),
    }
}
