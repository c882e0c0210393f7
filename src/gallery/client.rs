//! HTTP transport for the gallery endpoints.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::models::{FolderContents, MediaFile};

use super::envelope;
use super::ApiError;

/// Upload payload for an edited image.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Target folder; `None` uploads to the gallery root.
    pub folder: Option<String>,
}

/// Operations the rest of the crate needs from the CMS.
///
/// [`GalleryClient`] is the production implementation; tests substitute
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait MediaApi {
    async fn list_folder(&self, folder_id: &str) -> Result<FolderContents, ApiError>;

    async fn delete_media(&self, file: &MediaFile) -> Result<(), ApiError>;

    async fn upload_image(&self, upload: ImageUpload) -> Result<MediaFile, ApiError>;
}

#[derive(Debug, Clone)]
pub struct GalleryClient {
    http: Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Form actions answer with JSON instead of a redirect when this is set.
        headers.insert("x-sveltekit-action", HeaderValue::from_static("true"));

        let http = Client::builder()
            .timeout(cfg.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Listing endpoint for `folder_id`, which is sent as one encoded path
    /// segment.
    fn folder_url(&self, folder_id: &str) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::InvalidRequest(format!("base URL {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "systemVirtualFolder", folder_id]);
        Ok(url)
    }
}

/// Read the body and decode it, mapping non-2xx statuses to [`ApiError::Status`].
async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = envelope::error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = read_body(response).await?;
    envelope::decode(&body)
}

impl MediaApi for GalleryClient {
    async fn list_folder(&self, folder_id: &str) -> Result<FolderContents, ApiError> {
        if folder_id.is_empty() {
            return Err(ApiError::InvalidRequest("folder id is empty".to_string()));
        }
        let url = self.folder_url(folder_id)?;
        tracing::debug!(%url, "listing folder");
        let response = self.http.get(url).send().await?;
        decode_response(response).await
    }

    async fn delete_media(&self, file: &MediaFile) -> Result<(), ApiError> {
        let item = serde_json::to_string(file)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let form = Form::new().text("item", item);
        tracing::debug!(id = %file.id, filename = %file.filename, "deleting media");
        let response = self
            .http
            .post(self.url("/mediagallery?/deleteMedia"))
            .multipart(form)
            .send()
            .await?;
        let body = read_body(response).await?;
        envelope::expect_success(&body)
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<MediaFile, ApiError> {
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let mut form = Form::new().part("files", part);
        if let Some(folder) = upload.folder {
            form = form.text("folder", folder);
        }
        tracing::info!(file = %upload.file_name, bytes = size, "uploading edited image");
        let response = self
            .http
            .post(self.url("/mediagallery?/upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResult = decode_response(response).await?;
        uploaded.into_file()
    }
}

/// The upload action answers with either the stored file or a list of them.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum UploadResult {
    One(MediaFile),
    Many(Vec<MediaFile>),
}

impl UploadResult {
    fn into_file(self) -> Result<MediaFile, ApiError> {
        match self {
            Self::One(file) => Ok(file),
            Self::Many(files) => files
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::Decode("upload returned no files".to_string())),
        }
    }
}
