//! Editing tools and their contextual toolbar configuration.
//!
//! [`ActiveTool`] names the single editing mode that currently owns canvas
//! input. [`ToolbarControls`] is the per-tool toolbar state; it is replaced
//! wholesale whenever the active tool changes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The editing mode holding exclusive input focus.
///
/// Serialized as a snake_case string (e.g. `"crop"`, `"focal_point"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTool {
    Crop,
    Blur,
    Rotate,
    Watermark,
    Annotate,
    FocalPoint,
    FineTune,
}

impl ActiveTool {
    pub const ALL: [ActiveTool; 7] = [
        ActiveTool::Crop,
        ActiveTool::Blur,
        ActiveTool::Rotate,
        ActiveTool::Watermark,
        ActiveTool::Annotate,
        ActiveTool::FocalPoint,
        ActiveTool::FineTune,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Blur => "blur",
            Self::Rotate => "rotate",
            Self::Watermark => "watermark",
            Self::Annotate => "annotate",
            Self::FocalPoint => "focal_point",
            Self::FineTune => "fine_tune",
        }
    }

    /// Parse a tool name coming from the front-end, where the empty string
    /// means "no tool".
    pub fn parse_optional(s: &str) -> Result<Option<Self>, UnknownTool> {
        if s.trim().is_empty() {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl std::fmt::Display for ActiveTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown editing tool '{0}'")]
pub struct UnknownTool(pub String);

impl FromStr for ActiveTool {
    type Err = UnknownTool;

    /// Accepts snake_case, camelCase and squashed spellings
    /// (`focal_point`, `focalPoint`, `focalpoint`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "crop" => Ok(Self::Crop),
            "blur" => Ok(Self::Blur),
            "rotate" => Ok(Self::Rotate),
            "watermark" => Ok(Self::Watermark),
            "annotate" => Ok(Self::Annotate),
            "focalpoint" => Ok(Self::FocalPoint),
            "finetune" => Ok(Self::FineTune),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurMode {
    Gaussian,
    Pixelate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionShape {
    Rectangle,
    Ellipse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Arrow,
    Rectangle,
    Circle,
    Text,
    Freehand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    Center,
    BottomLeft,
    BottomRight,
}

/// Contextual toolbar state of the active tool.
///
/// Serialized adjacently tagged as `{ "tool": "<name>", "props": { ... } }`
/// so the front-end can pick the matching toolbar component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "props", rename_all = "snake_case")]
pub enum ToolbarControls {
    #[serde(rename_all = "camelCase")]
    Crop {
        /// `None` means free-form.
        aspect_ratio: Option<f64>,
        rotation: f64,
        flip_horizontal: bool,
        flip_vertical: bool,
    },
    #[serde(rename_all = "camelCase")]
    Blur {
        mode: BlurMode,
        strength: u32,
        shape: RegionShape,
    },
    #[serde(rename_all = "camelCase")]
    Rotate { angle: f64 },
    #[serde(rename_all = "camelCase")]
    Watermark {
        text: String,
        opacity: f64,
        position: WatermarkPosition,
    },
    #[serde(rename_all = "camelCase")]
    Annotate {
        kind: AnnotationKind,
        stroke_color: String,
        stroke_width: f64,
    },
    #[serde(rename_all = "camelCase")]
    FocalPoint { x: f64, y: f64 },
    #[serde(rename_all = "camelCase")]
    FineTune {
        brightness: f64,
        contrast: f64,
        saturation: f64,
        exposure: f64,
        temperature: f64,
    },
}

impl ToolbarControls {
    /// Toolbar state shown when `tool` is first activated.
    pub fn defaults_for(tool: ActiveTool) -> Self {
        match tool {
            ActiveTool::Crop => Self::Crop {
                aspect_ratio: None,
                rotation: 0.0,
                flip_horizontal: false,
                flip_vertical: false,
            },
            ActiveTool::Blur => Self::Blur {
                mode: BlurMode::Gaussian,
                strength: 10,
                shape: RegionShape::Rectangle,
            },
            ActiveTool::Rotate => Self::Rotate { angle: 0.0 },
            ActiveTool::Watermark => Self::Watermark {
                text: String::new(),
                opacity: 0.5,
                position: WatermarkPosition::BottomRight,
            },
            ActiveTool::Annotate => Self::Annotate {
                kind: AnnotationKind::Arrow,
                stroke_color: "#ff0000".to_string(),
                stroke_width: 4.0,
            },
            ActiveTool::FocalPoint => Self::FocalPoint { x: 0.5, y: 0.5 },
            ActiveTool::FineTune => Self::FineTune {
                brightness: 0.0,
                contrast: 0.0,
                saturation: 0.0,
                exposure: 0.0,
                temperature: 0.0,
            },
        }
    }

    /// The tool these controls belong to.
    pub fn tool(&self) -> ActiveTool {
        match self {
            Self::Crop { .. } => ActiveTool::Crop,
            Self::Blur { .. } => ActiveTool::Blur,
            Self::Rotate { .. } => ActiveTool::Rotate,
            Self::Watermark { .. } => ActiveTool::Watermark,
            Self::Annotate { .. } => ActiveTool::Annotate,
            Self::FocalPoint { .. } => ActiveTool::FocalPoint,
            Self::FineTune { .. } => ActiveTool::FineTune,
        }
    }
}
