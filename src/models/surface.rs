use crate::error::RenderError;
use std::io::Cursor;
use tiny_skia::Pixmap;

/// Destination surface: a pixmap backing buffer kept in sync with the
/// displayed size reported by the hosting layout.
///
/// The backing resolution is always integer pixels; fractional displayed
/// sizes are rounded so the buffer matches the displayed box exactly.
#[derive(Clone)]
pub struct DrawSurface {
    pixmap: Pixmap,
    displayed_width: f32,
    displayed_height: f32,
}

impl DrawSurface {
    pub fn new(displayed_width: f32, displayed_height: f32) -> Result<Self, RenderError> {
        let (w, h) = backing_size(displayed_width, displayed_height);
        let pixmap = Pixmap::new(w, h).ok_or(RenderError::PixmapAllocation)?;
        Ok(Self {
            pixmap,
            displayed_width,
            displayed_height,
        })
    }

    /// Sync the backing buffer to a new displayed size.
    ///
    /// Returns `true` if the backing store was reallocated. A resize that
    /// rounds to the current backing resolution is a no-op, so repeated
    /// layout events do not churn the buffer.
    pub fn resize(&mut self, displayed_width: f32, displayed_height: f32) -> bool {
        self.displayed_width = displayed_width;
        self.displayed_height = displayed_height;
        let (w, h) = backing_size(displayed_width, displayed_height);
        if w == self.pixmap.width() && h == self.pixmap.height() {
            return false;
        }
        match Pixmap::new(w, h) {
            Some(pixmap) => {
                self.pixmap = pixmap;
                true
            }
            None => {
                tracing::warn!(width = w, height = h, "failed to reallocate surface backing");
                false
            }
        }
    }

    pub fn backing_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn backing_height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn displayed_size(&self) -> (f32, f32) {
        (self.displayed_width, self.displayed_height)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Replace the backing buffer wholesale with a fully composed frame.
    ///
    /// The frame must match the current backing resolution; a mismatched
    /// frame (surface resized while the frame was being composed) is
    /// rejected so a stale size never lands on screen.
    pub fn commit_frame(&mut self, frame: Pixmap) -> bool {
        if frame.width() != self.pixmap.width() || frame.height() != self.pixmap.height() {
            tracing::debug!(
                frame_width = frame.width(),
                frame_height = frame.height(),
                surface_width = self.pixmap.width(),
                surface_height = self.pixmap.height(),
                "discarding frame composed for an outdated surface size"
            );
            return false;
        }
        self.pixmap = frame;
        true
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Export the current backing buffer as an RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder =
                png::Encoder::new(&mut buf, self.pixmap.width(), self.pixmap.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| RenderError::PngEncode(e.to_string()))?;
            writer
                .write_image_data(&rgba)
                .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        }
        Ok(buf.into_inner())
    }
}

impl std::fmt::Debug for DrawSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawSurface")
            .field("backing_width", &self.pixmap.width())
            .field("backing_height", &self.pixmap.height())
            .field("displayed_width", &self.displayed_width)
            .field("displayed_height", &self.displayed_height)
            .finish()
    }
}

/// Round a displayed size to integer backing pixels, at least 1x1.
fn backing_size(width: f32, height: f32) -> (u32, u32) {
    let w = width.max(0.0).round() as u32;
    let h = height.max(0.0).round() as u32;
    (w.max(1), h.max(1))
}
