pub mod canvas;
pub mod panning;

pub use canvas::{CanvasManager, RenderOutcome};
pub use panning::PanController;
