//! Bulk deletion with per-file accounting.

use serde::Serialize;

use crate::models::MediaFile;

use super::client::MediaApi;
use super::toast::{Toast, ToastKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub id: String,
    pub filename: String,
    pub message: String,
}

/// Outcome of [`bulk_delete`]. `succeeded.len() + failed.len()` always equals
/// the number of files requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkDeleteReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Aggregate notification for the whole batch.
    pub fn toast(&self) -> Toast {
        let total = self.total();
        let ok = self.succeeded.len();
        let failed = self.failed.len();
        if failed == 0 {
            Toast::new(ToastKind::Success, format!("Deleted {}", files(ok)))
        } else if ok == 0 {
            Toast::new(ToastKind::Error, format!("Failed to delete {}", files(failed)))
        } else {
            Toast::new(
                ToastKind::Warning,
                format!("Deleted {ok} of {}; {failed} failed", files(total)),
            )
        }
    }
}

fn files(n: usize) -> String {
    if n == 1 {
        "1 file".to_string()
    } else {
        format!("{n} files")
    }
}

/// Delete every file in `files`, one request at a time.
///
/// A failure never aborts the batch; it is recorded and the next file is
/// attempted.
pub async fn bulk_delete<A: MediaApi>(api: &A, files: &[MediaFile]) -> BulkDeleteReport {
    let mut report = BulkDeleteReport::default();
    for file in files {
        match api.delete_media(file).await {
            Ok(()) => report.succeeded.push(file.id.clone()),
            Err(e) => {
                tracing::warn!(
                    id = %file.id,
                    filename = %file.filename,
                    error = %e,
                    "delete failed"
                );
                report.failed.push(BulkFailure {
                    id: file.id.clone(),
                    filename: file.filename.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "bulk delete finished"
    );
    report
}
