use crate::error::RenderError;
use crate::rendering::{shapes, viewport};
use resvg::usvg;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Which strategy ended up producing the document's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// Whole-document raster strategy succeeded.
    Raster,
    /// Raster failed; the per-element vector walk drew instead.
    Vector,
    /// Nothing was drawn (parse failure or degenerate geometry).
    Skipped,
}

/// Renders a vector document onto a pixmap.
///
/// Two-stage strategy: rasterize the whole document first, because that
/// faithfully reproduces gradients, filters and text the vector walk
/// cannot replicate. Only when rasterization reports a failure does the
/// per-element fallback run, under the same fit-within mapping. The
/// outcome drives the branch; no failure escapes this type.
pub struct SvgRenderer {
    /// Font database for raster-stage text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(font_count = fontdb.len(), "loaded fonts for raster stage");
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Draw `source` onto `pixmap`. The surface is expected to be cleared
    /// and background-composited already; a failed parse leaves it as is.
    /// Identical inputs produce identical pixels.
    pub fn render_document(&self, source: &str, pixmap: &mut Pixmap) -> RenderStage {
        let doc = match parse_document(source) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "keeping background only");
                return RenderStage::Skipped;
            }
        };
        let root = doc.root_element();

        let surf_w = pixmap.width() as f32;
        let surf_h = pixmap.height() as f32;
        let (doc_w, doc_h) = viewport::document_size(root, surf_w, surf_h);
        let vt = viewport::fit_within(doc_w, doc_h, surf_w, surf_h);
        if !vt.is_drawable() {
            tracing::debug!(doc_w, doc_h, "degenerate document size, skipping draw");
            return RenderStage::Skipped;
        }

        match self.raster_stage(source, pixmap) {
            Ok(()) => RenderStage::Raster,
            Err(e) => {
                tracing::warn!(error = %e, "raster stage failed, falling back to vector walk");
                let ts = vt.to_skia();
                for child in root.children() {
                    shapes::draw_element(pixmap, child, ts);
                }
                RenderStage::Vector
            }
        }
    }

    /// Rasterize the whole document with resvg, fit within the surface.
    ///
    /// resvg resolves the document size itself (including the bounding
    /// box of content when no viewBox or size is declared), so the fit is
    /// recomputed from the tree here rather than the raw attributes.
    fn raster_stage(&self, source: &str, pixmap: &mut Pixmap) -> Result<(), RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree =
            usvg::Tree::from_str(source, &options).map_err(|e| RenderError::Raster(e.to_string()))?;

        let size = tree.size();
        let vt = viewport::fit_within(
            size.width(),
            size.height(),
            pixmap.width() as f32,
            pixmap.height() as f32,
        );
        if !vt.is_drawable() {
            return Err(RenderError::Raster("degenerate tree size".to_string()));
        }

        resvg::render(&tree, vt.to_skia(), &mut pixmap.as_mut());
        Ok(())
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the document text and require an `svg` root element.
fn parse_document(source: &str) -> Result<roxmltree::Document<'_>, RenderError> {
    let doc =
        roxmltree::Document::parse(source).map_err(|e| RenderError::SvgParse(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(RenderError::SvgParse(format!(
            "expected svg root element, found {}",
            root.tag_name().name()
        )));
    }
    Ok(doc)
}
