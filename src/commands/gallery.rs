//! Gallery command handlers.
//!
//! Thin async wrappers over [`crate::gallery`] that apply the duplicate-load
//! guard and convert [`crate::gallery::ApiError`] into [`AppError`].

use crate::error::AppError;
use crate::gallery::client::ImageUpload;
use crate::gallery::export::{ExportError, ExportFormat, ExportPlan};
use crate::gallery::{bulk_delete, BulkDeleteReport, FolderLoadGuard, MediaApi};
use crate::models::{FolderContents, MediaFile};

/// List `folder_id`.
///
/// Returns `Ok(None)` when the guard skipped the load: another load is in
/// flight, or the folder is already shown and `force` is false.
pub async fn list_folder<A: MediaApi>(
    api: &A,
    guard: &FolderLoadGuard,
    folder_id: &str,
    force: bool,
) -> Result<Option<FolderContents>, AppError> {
    let Some(ticket) = guard.try_begin(folder_id, force) else {
        return Ok(None);
    };
    let contents = api.list_folder(ticket.folder_id()).await?;
    tracing::info!(
        folder_id = ticket.folder_id(),
        files = contents.files.len(),
        subfolders = contents.subfolders.len(),
        "folder loaded"
    );
    ticket.complete();
    Ok(Some(contents))
}

/// Delete `files` one by one. Any successful delete invalidates the cached
/// listing so the next navigation reloads it.
pub async fn delete_files<A: MediaApi>(
    api: &A,
    guard: &FolderLoadGuard,
    files: &[MediaFile],
) -> Result<BulkDeleteReport, AppError> {
    if files.is_empty() {
        return Err(AppError::InvalidInput("no files selected".to_string()));
    }
    let report = bulk_delete(api, files).await;
    if !report.succeeded.is_empty() {
        guard.invalidate();
    }
    Ok(report)
}

/// Export the edited canvas and upload it next to the original.
///
/// `render` produces a data URL for the requested format; see
/// [`ExportPlan::run`] for the fallback rules.
pub async fn save_edited_image<A, F>(
    api: &A,
    guard: &FolderLoadGuard,
    original: &MediaFile,
    folder: Option<String>,
    render: F,
) -> Result<MediaFile, AppError>
where
    A: MediaApi,
    F: FnMut(ExportFormat) -> Result<String, ExportError>,
{
    let image = ExportPlan::default().run(&original.filename, render)?;
    let upload = ImageUpload {
        file_name: image.file_name.clone(),
        mime_type: image.mime_type().to_string(),
        bytes: image.bytes,
        folder,
    };
    let saved = api.upload_image(upload).await?;
    guard.invalidate();
    tracing::info!(
        original = %original.filename,
        saved = %saved.filename,
        "edited image uploaded"
    );
    Ok(saved)
}
