use crate::rendering::attrs::{resolve_paint, ResolvedPaint};
use tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// The closed set of element kinds the vector walk understands.
///
/// Anything not listed rasterizes nothing itself but still has its
/// children walked, which is how groups and other wrappers are
/// effectively supported without dedicated handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Path,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Container,
}

impl ShapeKind {
    pub fn classify(tag: &str) -> Self {
        match tag {
            "path" => Self::Path,
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "line" => Self::Line,
            "polyline" => Self::Polyline,
            "polygon" => Self::Polygon,
            _ => Self::Container,
        }
    }
}

/// Draw one element (recursing through containers) onto `pixmap` under
/// the document-to-surface transform. Failures are local: a bad element
/// is skipped, the walk continues.
pub fn draw_element(pixmap: &mut Pixmap, node: roxmltree::Node<'_, '_>, ts: Transform) {
    if !node.is_element() {
        return;
    }

    let kind = ShapeKind::classify(node.tag_name().name());
    if kind == ShapeKind::Container {
        for child in node.children() {
            draw_element(pixmap, child, ts);
        }
        return;
    }

    let paint = resolve_paint(node);
    let geometry = match kind {
        ShapeKind::Path => path_geometry(node),
        ShapeKind::Rect => rect_geometry(node),
        ShapeKind::Circle => circle_geometry(node),
        ShapeKind::Ellipse => ellipse_geometry(node),
        ShapeKind::Line => line_geometry(node),
        ShapeKind::Polyline => poly_geometry(node, false),
        ShapeKind::Polygon => poly_geometry(node, true),
        ShapeKind::Container => unreachable!(),
    };
    let Some(path) = geometry else {
        return;
    };

    // Lines have no interior; fill is meaningless and never applied.
    let fillable = kind != ShapeKind::Line;
    paint_path(pixmap, &path, &paint, ts, fillable);
}

/// Fill (when enabled and a fill is resolved) then stroke. Fill always
/// precedes stroke so outlines stay on top.
fn paint_path(
    pixmap: &mut Pixmap,
    path: &Path,
    resolved: &ResolvedPaint,
    ts: Transform,
    fillable: bool,
) {
    let mut paint = Paint::default();
    paint.anti_alias = true;

    if fillable {
        if let Some(color) = resolved.fill {
            paint.set_color(color);
            pixmap.fill_path(path, &paint, FillRule::Winding, ts, None);
        }
    }
    if let Some(color) = resolved.stroke {
        paint.set_color(color);
        let stroke = Stroke {
            width: resolved.stroke_width,
            ..Stroke::default()
        };
        pixmap.stroke_path(path, &paint, &stroke, ts, None);
    }
}

/// Positional attributes parse as decimal numbers, defaulting to 0 when
/// missing or unparsable so a bad value never aborts the element.
fn num_attr(node: roxmltree::Node<'_, '_>, name: &str) -> f32 {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<svgtypes::Length>().ok())
        .map(|l| l.number as f32)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn path_geometry(node: roxmltree::Node<'_, '_>) -> Option<Path> {
    let data = node.attribute("d")?;
    let bez = match kurbo::BezPath::from_svg(data) {
        Ok(bez) => bez,
        Err(e) => {
            tracing::warn!(error = %e, "skipping path with unparsable data");
            return None;
        }
    };

    let mut pb = PathBuilder::new();
    for el in bez.elements() {
        match *el {
            kurbo::PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            kurbo::PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            kurbo::PathEl::QuadTo(c, p) => {
                pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32)
            }
            kurbo::PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            kurbo::PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

// Cubic approximation factor for a quarter arc.
const ARC_K: f32 = 0.552_284_8;

fn rect_geometry(node: roxmltree::Node<'_, '_>) -> Option<Path> {
    let x = num_attr(node, "x");
    let y = num_attr(node, "y");
    let w = num_attr(node, "width");
    let h = num_attr(node, "height");
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    let rx = num_attr(node, "rx");
    // ry defaults to rx when not given.
    let ry = match node.attribute("ry") {
        Some(_) => num_attr(node, "ry"),
        None => rx,
    };
    if rx <= 0.0 && ry <= 0.0 {
        let mut pb = PathBuilder::new();
        pb.push_rect(Rect::from_xywh(x, y, w, h)?);
        return pb.finish();
    }

    // Rounded rect: four straight edges joined by quarter-arc corners.
    let r = if rx > 0.0 { rx } else { ry };
    let r = r.min(w / 2.0).min(h / 2.0);
    let k = ARC_K * r;

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

fn circle_geometry(node: roxmltree::Node<'_, '_>) -> Option<Path> {
    let cx = num_attr(node, "cx");
    let cy = num_attr(node, "cy");
    let r = num_attr(node, "r");
    if r <= 0.0 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.push_circle(cx, cy, r);
    pb.finish()
}

fn ellipse_geometry(node: roxmltree::Node<'_, '_>) -> Option<Path> {
    let cx = num_attr(node, "cx");
    let cy = num_attr(node, "cy");
    let rx = num_attr(node, "rx");
    let ry = num_attr(node, "ry");
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.push_oval(Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0)?);
    pb.finish()
}

fn line_geometry(node: roxmltree::Node<'_, '_>) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(num_attr(node, "x1"), num_attr(node, "y1"));
    pb.line_to(num_attr(node, "x2"), num_attr(node, "y2"));
    pb.finish()
}

fn poly_geometry(node: roxmltree::Node<'_, '_>, close: bool) -> Option<Path> {
    let numbers = parse_points(node.attribute("points").unwrap_or(""));
    // One point is not enough to draw anything; silent no-op.
    if numbers.len() < 2 {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(numbers[0], numbers[1]);
    for pair in numbers[2..].chunks_exact(2) {
        pb.line_to(pair[0], pair[1]);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Split a `points` attribute on whitespace or commas into a flat numeric
/// sequence, discarding non-numeric tokens.
pub fn parse_points(value: &str) -> Vec<f32> {
    value
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter_map(|token| token.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .collect()
}
