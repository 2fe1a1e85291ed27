//! Inklay - SVG canvas compositor
//!
//! Renders a selected vector document onto a shared drawing surface,
//! optionally compositing a panned/zoomed raster background beneath it,
//! and exports the composed surface as a PNG.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
