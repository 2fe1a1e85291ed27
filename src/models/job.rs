use crate::error::RenderError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A render job description for the CLI: compose one document (plus an
/// optional background) onto a fixed-size surface and write a PNG.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderJob {
    /// Path to the SVG document
    pub input: PathBuf,

    /// Output PNG file path
    pub output: PathBuf,

    /// Surface width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Surface height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Optional background image (PNG or JPEG)
    #[serde(default)]
    pub background: Option<PathBuf>,

    /// Background zoom percentage (100 = exactly covering)
    #[serde(default = "default_zoom")]
    pub zoom: f32,

    /// Background pan offset, surface pixels
    #[serde(default)]
    pub pan_x: f64,
    #[serde(default)]
    pub pan_y: f64,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    480
}

fn default_zoom() -> f32 {
    100.0
}

impl RenderJob {
    /// Load a job description from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RenderError::JobFile(e.to_string()))
    }
}
