//! Background file cleanup.
//!
//! Stale uploads (replaced or orphaned images) are deleted by a supervised
//! worker task fed through an unbounded queue, decoupled from the
//! request/response cycle. Failures are retried a few times and then logged;
//! a missing file counts as done.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::backend::uploads::absolute_path;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Handle for scheduling file deletions. Cheap to clone; lives in `AppState`.
#[derive(Clone)]
pub struct CleanupQueue {
    tx: mpsc::UnboundedSender<String>,
}

impl CleanupQueue {
    /// Schedule deletion of a stored file by its record-relative path
    /// (e.g. `/uploads/abc.jpg`).
    pub fn schedule(&self, relative_path: impl Into<String>) {
        let relative_path = relative_path.into();
        if self.tx.send(relative_path.clone()).is_err() {
            tracing::error!(path = %relative_path, "cleanup worker gone, file not scheduled");
        }
    }
}

/// Spawn the deletion worker and return its queue handle.
pub fn spawn_cleanup_worker(root: PathBuf) -> CleanupQueue {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(relative) = rx.recv().await {
            let path = absolute_path(&root, &relative);
            delete_with_retry(&path).await;
        }
        tracing::debug!("cleanup queue closed, worker exiting");
    });

    CleanupQueue { tx }
}

async fn delete_with_retry(path: &PathBuf) {
    for attempt in 1..=MAX_ATTEMPTS {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "stale upload removed");
                return;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "stale upload already gone");
                return;
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    path = %path.display(),
                    attempt,
                    "upload removal failed, retrying: {e}"
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    "upload removal failed after {MAX_ATTEMPTS} attempts: {e}"
                );
            }
        }
    }
}
