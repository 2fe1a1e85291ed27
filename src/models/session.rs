use crate::error::RenderError;
use crate::models::background::{decode_background, BackgroundLayer, BackgroundSnapshot};
use kurbo::Vec2;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// The currently selected vector document. Immutable once loaded; a new
/// selection replaces it wholesale (last-loaded-wins, no history).
#[derive(Debug, Clone)]
pub struct SourceDocument {
    text: String,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Change notification emitted by layer- and document-mutating operations,
/// so drivers re-render on demand instead of polling for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    DocumentReplaced,
    DocumentCleared,
    BackgroundChanged,
    BackgroundCleared,
    ZoomChanged,
    PanChanged,
}

type Listener = Box<dyn Fn(SessionEvent) + Send + Sync>;

/// Explicit per-surface state: the current document and the optional
/// background layer, with defined replace/clear lifecycle. Passing the
/// session into render calls keeps multiple surfaces and test fixtures
/// from cross-contaminating.
#[derive(Default)]
pub struct Session {
    document: Option<SourceDocument>,
    background: Option<BackgroundLayer>,
    listeners: Vec<Listener>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn(SessionEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn document(&self) -> Option<&SourceDocument> {
        self.document.as_ref()
    }

    /// Replace the current document. Empty or malformed text is accepted
    /// here; the renderer degrades it to a background-only frame.
    pub fn set_document(&mut self, text: impl Into<String>) {
        self.document = Some(SourceDocument::new(text));
        self.emit(SessionEvent::DocumentReplaced);
    }

    pub fn clear_document(&mut self) {
        if self.document.take().is_some() {
            self.emit(SessionEvent::DocumentCleared);
        }
    }

    pub fn background(&self) -> Option<&BackgroundLayer> {
        self.background.as_ref()
    }

    /// Consistent copy of the background state for an asynchronous render
    /// to hold across its suspension point.
    pub fn background_snapshot(&self) -> Option<BackgroundSnapshot> {
        self.background.clone()
    }

    /// Decode image bytes on the blocking pool and install them as the
    /// background layer. Zoom and pan carry over from the previous layer
    /// so swapping the image does not jump the view.
    pub async fn load_background(&mut self, bytes: Vec<u8>) -> Result<(), RenderError> {
        let image = tokio::task::spawn_blocking(move || decode_background(&bytes))
            .await
            .map_err(|e| RenderError::ImageDecode(format!("decode task failed: {e}")))??;
        self.set_background_image(Arc::new(image));
        Ok(())
    }

    /// Install an already decoded image as the background layer.
    pub fn set_background_image(&mut self, image: Arc<Pixmap>) {
        let mut layer = BackgroundLayer::new(image);
        if let Some(previous) = &self.background {
            layer.user_scale = previous.user_scale;
            layer.pan = previous.pan;
        }
        self.background = Some(layer);
        self.emit(SessionEvent::BackgroundChanged);
    }

    pub fn clear_background(&mut self) {
        if self.background.take().is_some() {
            self.emit(SessionEvent::BackgroundCleared);
        }
    }

    /// Map a UI percentage (default 100) onto the layer's user scale.
    /// No-op when no background layer is active.
    pub fn set_zoom_percent(&mut self, percent: f32) {
        let Some(layer) = self.background.as_mut() else {
            tracing::debug!("zoom change ignored, no background layer");
            return;
        };
        layer.user_scale = percent / 100.0;
        self.emit(SessionEvent::ZoomChanged);
    }

    /// Accumulate a drag delta into the layer pan offset.
    ///
    /// Returns `false` when no background layer is active, which also
    /// refuses the pan gesture upstream.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        let Some(layer) = self.background.as_mut() else {
            return false;
        };
        layer.pan += delta;
        self.emit(SessionEvent::PanChanged);
        true
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("document", &self.document.is_some())
            .field("background", &self.background)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
