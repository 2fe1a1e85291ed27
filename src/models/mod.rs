pub mod background;
pub mod job;
pub mod session;
pub mod surface;

pub use background::{decode_background, BackgroundLayer, BackgroundSnapshot};
pub use job::RenderJob;
pub use session::{Session, SessionEvent, SourceDocument};
pub use surface::DrawSurface;
