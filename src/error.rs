use thiserror::Error;

/// Failures that can occur while composing the drawing surface.
///
/// Everything here is recoverable: the render loop degrades to a
/// background-only or partially drawn surface and logs the cause.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Raster stage failed: {0}")]
    Raster(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Invalid job file: {0}")]
    JobFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
