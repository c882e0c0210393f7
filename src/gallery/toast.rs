//! User-facing notifications.

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }
}

impl From<&AppError> for Toast {
    fn from(e: &AppError) -> Self {
        Self::error(e.user_message())
    }
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind {
            ToastKind::Success => "ok",
            ToastKind::Warning => "warn",
            ToastKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NETWORK_FAILED_MESSAGE, RESTORE_FAILED_MESSAGE};

    #[test]
    fn network_errors_use_generic_message() {
        let toast = Toast::from(&AppError::Timeout);
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, NETWORK_FAILED_MESSAGE);

        let toast = Toast::from(&AppError::Network("connection refused".into()));
        assert_eq!(toast.message, NETWORK_FAILED_MESSAGE);
    }

    #[test]
    fn restore_errors_use_restore_banner() {
        let toast = Toast::from(&AppError::Restore("bad json".into()));
        assert_eq!(toast.message, RESTORE_FAILED_MESSAGE);
    }

    #[test]
    fn api_errors_keep_server_text() {
        let toast = Toast::from(&AppError::Api("file is in use".into()));
        assert_eq!(toast.message, "file is in use");
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let json = serde_json::to_value(Toast::success("Saved")).expect("serialize");
        assert_eq!(json, serde_json::json!({ "kind": "success", "message": "Saved" }));
    }

    #[test]
    fn display_is_tagged() {
        assert_eq!(Toast::error("nope").to_string(), "[error] nope");
    }
}
