use crate::error::RenderError;
use crate::models::background::BackgroundSnapshot;
use crate::models::session::Session;
use crate::models::surface::DrawSurface;
use crate::rendering::compositor;
use crate::rendering::svg::{RenderStage, SvgRenderer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tiny_skia::Pixmap;
use tokio::sync::Mutex;

/// What happened to one render invocation's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The frame was committed to the surface.
    Committed(RenderStage),
    /// A newer render superseded this one; the frame was discarded.
    Superseded,
    /// Nothing could be composed (allocation failure); surface untouched.
    Failed,
}

/// Owns one destination surface and exposes the single "render
/// everything" entry point: sync backing size, clear, composite the
/// background, then run the document pipeline.
///
/// Because the document stage suspends (rasterization runs on the
/// blocking pool), a later render can finish before an earlier one.
/// Every invocation takes a monotonically increasing generation; only a
/// frame whose generation is still the latest may commit, so a slow
/// stale render never overwrites a newer, already visible result.
pub struct CanvasManager {
    surface: Arc<Mutex<DrawSurface>>,
    renderer: Arc<SvgRenderer>,
    generation: AtomicU64,
}

impl CanvasManager {
    pub fn new(displayed_width: f32, displayed_height: f32) -> Result<Self, RenderError> {
        Ok(Self {
            surface: Arc::new(Mutex::new(DrawSurface::new(
                displayed_width,
                displayed_height,
            )?)),
            renderer: Arc::new(SvgRenderer::new()),
            generation: AtomicU64::new(0),
        })
    }

    /// Sync the surface backing to a new displayed size (layout event).
    /// Returns `true` when the backing store actually changed, which is
    /// the driver's cue to request a re-render.
    pub async fn resize_surface(&self, displayed_width: f32, displayed_height: f32) -> bool {
        self.surface.lock().await.resize(displayed_width, displayed_height)
    }

    /// Claim a new render generation. Issued at the start of every
    /// invocation; an older generation's commit becomes a no-op.
    pub fn begin_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Commit a composed frame unless its generation has been superseded
    /// or the surface was resized while it was being composed.
    pub async fn commit(
        &self,
        generation: u64,
        frame: Pixmap,
        stage: RenderStage,
    ) -> RenderOutcome {
        if !self.is_latest(generation) {
            tracing::debug!(generation, "discarding stale render");
            return RenderOutcome::Superseded;
        }
        let mut surface = self.surface.lock().await;
        if !self.is_latest(generation) {
            tracing::debug!(generation, "discarding stale render");
            return RenderOutcome::Superseded;
        }
        if surface.commit_frame(frame) {
            RenderOutcome::Committed(stage)
        } else {
            RenderOutcome::Superseded
        }
    }

    /// Full idempotent composite: background layer beneath the current
    /// document. Internal failures degrade to a background-only or empty
    /// frame; nothing escapes this boundary.
    pub async fn render_everything(&self, session: &Session) -> RenderOutcome {
        let generation = self.begin_generation();

        // Snapshot mutable state before suspending; the layer may change
        // while the frame is being composed.
        let background = session.background_snapshot();
        let source: Option<String> = session.document().map(|d| d.text().to_string());
        let (width, height) = {
            let surface = self.surface.lock().await;
            (surface.backing_width(), surface.backing_height())
        };

        let renderer = self.renderer.clone();
        let composed = tokio::task::spawn_blocking(move || {
            compose_frame(&renderer, width, height, background.as_ref(), source.as_deref())
        })
        .await;

        match composed {
            Ok(Some((frame, stage))) => self.commit(generation, frame, stage).await,
            Ok(None) => RenderOutcome::Failed,
            Err(e) => {
                tracing::error!(error = %e, "compose task failed");
                RenderOutcome::Failed
            }
        }
    }

    /// Current backing-resolution image as a PNG, for save-as-file.
    pub async fn export_png(&self) -> Result<Vec<u8>, RenderError> {
        self.surface.lock().await.encode_png()
    }

    /// Copy of the current backing buffer (test and inspection hook).
    pub async fn snapshot(&self) -> Pixmap {
        self.surface.lock().await.pixmap().clone()
    }
}

/// Compose one frame off-surface: clear, background, then the document
/// pipeline. Runs on the blocking pool.
fn compose_frame(
    renderer: &SvgRenderer,
    width: u32,
    height: u32,
    background: Option<&BackgroundSnapshot>,
    source: Option<&str>,
) -> Option<(Pixmap, RenderStage)> {
    let mut frame = match Pixmap::new(width, height) {
        Some(frame) => frame,
        None => {
            tracing::error!(width, height, "failed to allocate frame");
            return None;
        }
    };

    if let Some(layer) = background {
        compositor::draw_background(&mut frame, layer);
    }
    let stage = match source {
        Some(text) => renderer.render_document(text, &mut frame),
        None => RenderStage::Skipped,
    };
    Some((frame, stage))
}
