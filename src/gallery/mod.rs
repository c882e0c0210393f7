//! CMS media-gallery client.
//!
//! ```text
//! gallery/
//! ├── client.rs: MediaApi trait + reqwest-backed GalleryClient
//! ├── envelope.rs: normalisation of `{ success, data, error }` responses
//! ├── devalue.rs: decoder for the flattened form-action encoding
//! ├── loader.rs: duplicate-load guard for folder listings
//! ├── bulk.rs: bulk delete with success/failure accounting
//! ├── export.rs: data-URL export with AVIF → WebP fallback
//! └── toast.rs: user-facing notifications
//! ```
//!
//! Errors inside this module are [`ApiError`]; the command layer maps them to
//! [`crate::error::AppError`] at the boundary.

pub mod bulk;
pub mod client;
pub mod devalue;
pub mod envelope;
pub mod export;
pub mod loader;
pub mod toast;

pub use bulk::{bulk_delete, BulkDeleteReport};
pub use client::{GalleryClient, MediaApi};
pub use loader::FolderLoadGuard;
pub use toast::{Toast, ToastKind};

/// Internal error type for gallery requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("cannot decode response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else if e.is_builder() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
