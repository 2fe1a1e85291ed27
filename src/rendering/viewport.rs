use svgtypes::LengthUnit;

/// Uniform fit-within mapping from document coordinates onto a surface.
///
/// Derived purely from the source logical size and the destination size;
/// recomputed on every render and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl ViewportTransform {
    /// A zero scale marks degenerate input; drawing is skipped entirely.
    pub fn is_drawable(&self) -> bool {
        self.scale > 0.0 && self.scale.is_finite()
    }

    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_scale(self.scale, self.scale).post_translate(self.tx, self.ty)
    }
}

/// Compute the uniform scale that fits the document inside the surface,
/// centered. Aspect ratio is preserved exactly; the short axis is
/// letterboxed. Degenerate input yields `scale = 0`, never NaN/Infinity.
pub fn fit_within(doc_w: f32, doc_h: f32, surf_w: f32, surf_h: f32) -> ViewportTransform {
    let degenerate = !(doc_w.is_finite() && doc_h.is_finite())
        || doc_w <= 0.0
        || doc_h <= 0.0
        || surf_w <= 0.0
        || surf_h <= 0.0;
    if degenerate {
        return ViewportTransform {
            scale: 0.0,
            tx: 0.0,
            ty: 0.0,
        };
    }

    let scale = (surf_w / doc_w).min(surf_h / doc_h);
    ViewportTransform {
        scale,
        tx: (surf_w - doc_w * scale) / 2.0,
        ty: (surf_h - doc_h * scale) / 2.0,
    }
}

/// Resolve the document's logical size from its root element.
///
/// Priority: `viewBox` width/height, then explicit `width`/`height`
/// attributes (plain numbers or px lengths, per axis), then the surface
/// size as a last resort.
pub fn document_size(root: roxmltree::Node<'_, '_>, surf_w: f32, surf_h: f32) -> (f32, f32) {
    if let Some(raw) = root.attribute("viewBox") {
        if let Ok(vb) = raw.parse::<svgtypes::ViewBox>() {
            if vb.w > 0.0 && vb.h > 0.0 {
                return (vb.w as f32, vb.h as f32);
            }
        }
    }

    let w = length_attribute(root, "width").filter(|v| *v > 0.0);
    let h = length_attribute(root, "height").filter(|v| *v > 0.0);
    (w.unwrap_or(surf_w), h.unwrap_or(surf_h))
}

/// Parse an absolute pixel length attribute. Relative units (%, em, ...)
/// cannot be resolved against a detached tree and fall through.
fn length_attribute(node: roxmltree::Node<'_, '_>, name: &str) -> Option<f32> {
    let length = node.attribute(name)?.parse::<svgtypes::Length>().ok()?;
    match length.unit {
        LengthUnit::None | LengthUnit::Px => Some(length.number as f32),
        _ => None,
    }
}
