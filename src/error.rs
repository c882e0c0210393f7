//! Application-level error type returned by all command functions.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads so the
//! front-end can pattern-match on a stable `kind` string.

use crate::config::ConfigError;
use crate::gallery::export::ExportError;
use crate::gallery::ApiError;
use crate::models::tool::UnknownTool;
use crate::preferences::PreferencesError;
use crate::scene::SceneError;

/// Banner text shown when a snapshot cannot be pushed back into the scene.
pub const RESTORE_FAILED_MESSAGE: &str = "Failed to restore state";

/// Toast text for transport failures. There is no automatic retry.
pub const NETWORK_FAILED_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Top-level error returned by command functions.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// A requested resource (session, file, folder) was not found.
    #[error("{0}")]
    NotFound(String),

    /// The caller passed a value the command cannot interpret.
    #[error("{0}")]
    InvalidInput(String),

    /// The session has no image loaded into a scene.
    #[error("no image is loaded in this session")]
    NoScene,

    /// The scene graph failed outside of restoration.
    #[error("{0}")]
    Scene(String),

    /// A snapshot could not be restored into the scene.
    #[error("{0}")]
    Restore(String),

    /// The request never produced an HTTP response.
    #[error("{0}")]
    Network(String),

    /// The request exceeded the client-side timeout.
    #[error("request timed out")]
    Timeout,

    /// The CMS answered, but with an error.
    #[error("{0}")]
    Api(String),

    /// The edited image could not be exported for upload.
    #[error("{0}")]
    Export(String),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Preferences(String),

    /// A generic I/O error; the inner [`std::io::Error`] is converted to a
    /// string at the system boundary so it remains serializable.
    #[error("{0}")]
    Io(String),
}

impl AppError {
    /// Text suitable for a toast or banner.
    ///
    /// Transport failures collapse into one generic message; restoration
    /// failures into the fixed restore banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Timeout => NETWORK_FAILED_MESSAGE.to_string(),
            Self::Restore(_) => RESTORE_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::Restore(msg) => Self::Restore(msg),
            other => Self::Scene(other.to_string()),
        }
    }
}

impl From<ApiError> for AppError {
    /// Convert an [`ApiError`] at the command boundary.
    ///
    /// Timeouts and transport failures keep their own variants so the UI can
    /// show the generic network toast; everything else becomes
    /// [`AppError::Api`].
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Timeout => Self::Timeout,
            ApiError::Network(msg) => Self::Network(msg),
            other => Self::Api(other.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<PreferencesError> for AppError {
    fn from(e: PreferencesError) -> Self {
        Self::Preferences(e.to_string())
    }
}

impl From<UnknownTool> for AppError {
    fn from(e: UnknownTool) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
