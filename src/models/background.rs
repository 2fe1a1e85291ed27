use crate::error::RenderError;
use kurbo::Vec2;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Optional raster layer drawn beneath the vector content.
///
/// The decoded image is shared behind an `Arc` so a render in flight can
/// keep a consistent snapshot while the session mutates the layer.
#[derive(Clone)]
pub struct BackgroundLayer {
    pub image: Arc<Pixmap>,
    /// User zoom on top of cover scaling; 1.0 = exactly covering.
    pub user_scale: f32,
    /// Accumulated drag offset in surface pixels.
    pub pan: Vec2,
}

impl BackgroundLayer {
    pub fn new(image: Arc<Pixmap>) -> Self {
        Self {
            image,
            user_scale: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl std::fmt::Debug for BackgroundLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundLayer")
            .field("image_width", &self.image.width())
            .field("image_height", &self.image.height())
            .field("user_scale", &self.user_scale)
            .field("pan", &self.pan)
            .finish()
    }
}

/// Point-in-time copy of the layer taken before an asynchronous render
/// suspends, so pan/zoom changes during the wait cannot tear a frame.
pub type BackgroundSnapshot = BackgroundLayer;

/// Decode image bytes (PNG or JPEG) into a premultiplied pixmap.
pub fn decode_background(bytes: &[u8]) -> Result<Pixmap, RenderError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| RenderError::ImageDecode(e.to_string()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
    for (src, dst) in rgba
        .as_raw()
        .chunks_exact(4)
        .zip(pixmap.data_mut().chunks_exact_mut(4))
    {
        let a = src[3] as u16;
        dst[0] = ((src[0] as u16 * a) / 255) as u8;
        dst[1] = ((src[1] as u16 * a) / 255) as u8;
        dst[2] = ((src[2] as u16 * a) / 255) as u8;
        dst[3] = src[3];
    }
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let mut pixmap = Pixmap::new(4, 2).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        pixmap.encode_png().unwrap()
    }

    #[test]
    fn test_decode_background_dimensions() {
        let pixmap = decode_background(&tiny_png()).unwrap();
        assert_eq!(pixmap.width(), 4);
        assert_eq!(pixmap.height(), 2);
        let px = pixmap.pixel(0, 0).unwrap().demultiply();
        assert_eq!((px.red(), px.green(), px.blue()), (10, 20, 30));
    }

    #[test]
    fn test_decode_background_rejects_garbage() {
        let err = decode_background(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode(_)));
    }

    #[test]
    fn test_layer_defaults() {
        let layer = BackgroundLayer::new(Arc::new(Pixmap::new(1, 1).unwrap()));
        assert_eq!(layer.user_scale, 1.0);
        assert_eq!(layer.pan, Vec2::ZERO);
    }
}
