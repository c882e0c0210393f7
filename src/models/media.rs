//! Media gallery data model as returned by the CMS REST API.
//!
//! Keys are camelCase on the wire. The CMS stores documents with a Mongo-style
//! `_id`, and older endpoints report `name` instead of `filename`; both are
//! accepted as aliases.

use serde::{Deserialize, Serialize};

/// One file stored in the media gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub filename: String,
    /// Storage path relative to the media root.
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "type")]
    pub mime_type: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl MediaFile {
    /// `true` for raster images the editor can open.
    pub fn is_editable_image(&self) -> bool {
        match self.mime_type.as_deref() {
            Some(mime) => mime.starts_with("image/") && mime != "image/svg+xml",
            None => {
                let ext = self
                    .filename
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_ascii_lowercase())
                    .unwrap_or_default();
                matches!(
                    ext.as_str(),
                    "jpg" | "jpeg" | "png" | "webp" | "avif" | "gif" | "bmp" | "tiff"
                )
            }
        }
    }
}

/// A virtual folder in the gallery tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "parentId")]
    pub parent: Option<String>,
}

/// Payload of `GET /api/systemVirtualFolder/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderContents {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "currentFolder")]
    pub folder: Option<Folder>,
    #[serde(default, alias = "folders")]
    pub subfolders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<MediaFile>,
}
