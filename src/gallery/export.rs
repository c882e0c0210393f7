//! Export of the edited canvas for upload.
//!
//! The canvas renders to a data URL for a requested MIME type. Renderers that
//! do not support a type fall back to PNG without saying so, so a result is
//! only accepted when its MIME type matches the request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Avif,
    Webp,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("not a base64 data URL")]
    InvalidDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(String),
    #[error("no supported export format (tried {0})")]
    NoSupportedFormat(String),
    #[error("exported image is empty")]
    Empty,
}

/// Decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn parse_data_url(url: &str) -> Result<DataUrl, ExportError> {
    let rest = url.strip_prefix("data:").ok_or(ExportError::InvalidDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(ExportError::InvalidDataUrl)?;
    let mime_type = meta
        .strip_suffix(";base64")
        .ok_or(ExportError::InvalidDataUrl)?
        .to_ascii_lowercase();
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ExportError::Base64(e.to_string()))?;
    Ok(DataUrl { mime_type, bytes })
}

/// Image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Ordered list of formats to try.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    formats: Vec<ExportFormat>,
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self {
            formats: vec![ExportFormat::Avif, ExportFormat::Webp],
        }
    }
}

impl ExportPlan {
    /// Ask `render` for each format in turn and keep the first data URL whose
    /// MIME type matches. Render errors and mismatches move on to the next
    /// format.
    pub fn run<F>(&self, original_name: &str, mut render: F) -> Result<ExportedImage, ExportError>
    where
        F: FnMut(ExportFormat) -> Result<String, ExportError>,
    {
        for &format in &self.formats {
            let data_url = match render(format) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!(format = format.extension(), error = %e, "render failed");
                    continue;
                }
            };
            let decoded = match parse_data_url(&data_url) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::debug!(format = format.extension(), error = %e, "bad data URL");
                    continue;
                }
            };
            if decoded.mime_type != format.mime_type() {
                tracing::debug!(
                    requested = format.mime_type(),
                    got = %decoded.mime_type,
                    "format not supported by renderer"
                );
                continue;
            }
            if decoded.bytes.is_empty() {
                return Err(ExportError::Empty);
            }
            return Ok(ExportedImage {
                format,
                file_name: edited_file_name(original_name, format),
                bytes: decoded.bytes,
            });
        }
        let tried: Vec<&str> = self.formats.iter().map(|f| f.mime_type()).collect();
        Err(ExportError::NoSupportedFormat(tried.join(", ")))
    }
}

/// `photo.jpg` → `photo.avif`. Names without an extension get one appended.
pub fn edited_file_name(original: &str, format: ExportFormat) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original,
    };
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}.{}", format.extension())
}
