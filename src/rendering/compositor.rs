use crate::models::background::BackgroundSnapshot;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Placement of the background image on the surface: one uniform scale
/// and the top-left destination corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    pub scale: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Cover-scale the image so the surface has no empty margins (cropping is
/// allowed - the opposite policy from the document's fit-within mapping),
/// apply the user zoom on top, center, then shift by the pan offset.
pub fn cover_placement(
    img_w: f32,
    img_h: f32,
    surf_w: f32,
    surf_h: f32,
    user_scale: f32,
    pan: kurbo::Vec2,
) -> Option<CoverPlacement> {
    if img_w <= 0.0 || img_h <= 0.0 || surf_w <= 0.0 || surf_h <= 0.0 {
        return None;
    }
    let cover = (surf_w / img_w).max(surf_h / img_h);
    let scale = cover * user_scale;
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    Some(CoverPlacement {
        scale,
        dx: (surf_w - img_w * scale) / 2.0 + pan.x as f32,
        dy: (surf_h - img_h * scale) / 2.0 + pan.y as f32,
    })
}

/// Draw the background layer beneath whatever will be rendered next.
/// Absent or degenerate layers are a logged no-op; nothing propagates.
pub fn draw_background(pixmap: &mut Pixmap, layer: &BackgroundSnapshot) {
    let placement = cover_placement(
        layer.image.width() as f32,
        layer.image.height() as f32,
        pixmap.width() as f32,
        pixmap.height() as f32,
        layer.user_scale,
        layer.pan,
    );
    let Some(placement) = placement else {
        tracing::warn!(
            width = layer.image.width(),
            height = layer.image.height(),
            user_scale = layer.user_scale,
            "skipping degenerate background layer"
        );
        return;
    };

    let transform = Transform::from_scale(placement.scale, placement.scale)
        .post_translate(placement.dx, placement.dy);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, layer.image.as_ref().as_ref(), &paint, transform, None);
}
