pub mod attrs;
pub mod compositor;
pub mod shapes;
pub mod svg;
pub mod viewport;

pub use attrs::{resolve_paint, resolve_property, ResolvedPaint};
pub use compositor::draw_background;
pub use shapes::ShapeKind;
pub use svg::{RenderStage, SvgRenderer};
pub use viewport::{fit_within, ViewportTransform};
