//! Shared fixtures and pixel helpers for integration tests.

use std::sync::Arc;
use tiny_skia::Pixmap;

/// A 100x50 document whose single rect covers the whole viewBox.
pub const RED_BANNER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50">
    <rect x="0" y="0" width="100" height="50" fill="#ff0000"/>
</svg>"##;

/// Valid XML that the raster stage rejects (zero declared size), forcing
/// the per-element vector fallback.
pub fn fallback_svg(body: &str) -> String {
    format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0">{body}</svg>"#)
}

/// A 100x50 image, left half green and right half blue, for verifying
/// cover cropping and pan offsets.
pub fn two_tone_background() -> Arc<Pixmap> {
    let mut pixmap = Pixmap::new(100, 50).unwrap();
    pixmap.fill(tiny_skia::Color::from_rgba8(0, 200, 0, 255));
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(tiny_skia::Color::from_rgba8(0, 0, 200, 255));
    pixmap.fill_rect(
        tiny_skia::Rect::from_xywh(50.0, 0.0, 50.0, 50.0).unwrap(),
        &paint,
        tiny_skia::Transform::identity(),
        None,
    );
    Arc::new(pixmap)
}

/// Demultiplied (r, g, b, a) at a pixel.
pub fn rgba_at(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let px = pixmap.pixel(x, y).unwrap().demultiply();
    (px.red(), px.green(), px.blue(), px.alpha())
}

/// True when the pixel is green-ish rather than blue-ish; tolerant of
/// bilinear filtering at scaled edges.
pub fn is_green(pixmap: &Pixmap, x: u32, y: u32) -> bool {
    let (_, g, b, _) = rgba_at(pixmap, x, y);
    g > b
}
