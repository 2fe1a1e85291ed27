//! End-to-end pipeline tests through the public surface-manager API.

mod common;

use common::{fallback_svg, rgba_at, RED_BANNER_SVG};
use inklay::models::Session;
use inklay::rendering::RenderStage;
use inklay::services::{CanvasManager, RenderOutcome};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_viewbox_document_is_scaled_and_centered() {
    let manager = CanvasManager::new(200.0, 200.0).unwrap();
    let mut session = Session::new();
    session.set_document(RED_BANNER_SVG);

    let outcome = manager.render_everything(&session).await;
    assert_eq!(outcome, RenderOutcome::Committed(RenderStage::Raster));

    let frame = manager.snapshot().await;
    // scale = min(200/100, 200/50) = 2: the 100x50 content becomes a
    // 200x100 band centered vertically (rows 50..150).
    assert_eq!(rgba_at(&frame, 100, 100), (255, 0, 0, 255));
    assert_eq!(rgba_at(&frame, 2, 52), (255, 0, 0, 255));
    assert_eq!(rgba_at(&frame, 197, 147), (255, 0, 0, 255));
    assert_eq!(rgba_at(&frame, 100, 25).3, 0, "letterbox above must stay empty");
    assert_eq!(rgba_at(&frame, 100, 175).3, 0, "letterbox below must stay empty");
}

#[tokio::test]
async fn test_render_twice_is_pixel_identical() {
    let manager = CanvasManager::new(120.0, 90.0).unwrap();
    let mut session = Session::new();
    session.set_document(RED_BANNER_SVG);

    manager.render_everything(&session).await;
    let first = manager.snapshot().await;
    manager.render_everything(&session).await;
    let second = manager.snapshot().await;

    assert_eq!(first.data(), second.data());
}

#[tokio::test]
async fn test_malformed_document_degrades_to_background_only() {
    let manager = CanvasManager::new(40.0, 40.0).unwrap();
    let mut session = Session::new();
    session.set_background_image(common::two_tone_background());
    session.set_document("<<< not xml at all");

    let outcome = manager.render_everything(&session).await;
    assert_eq!(outcome, RenderOutcome::Committed(RenderStage::Skipped));

    // The background still fully covers the surface.
    let frame = manager.snapshot().await;
    assert_eq!(rgba_at(&frame, 20, 20).3, 255);
}

#[tokio::test]
async fn test_vector_fallback_through_the_manager() {
    let manager = CanvasManager::new(30.0, 30.0).unwrap();
    let mut session = Session::new();
    session.set_document(fallback_svg(
        r##"<polygon points="0,0 30,0 30,30 0,30" fill="#00ff00"/>"##,
    ));

    let outcome = manager.render_everything(&session).await;
    assert_eq!(outcome, RenderOutcome::Committed(RenderStage::Vector));
    let frame = manager.snapshot().await;
    assert_eq!(rgba_at(&frame, 15, 15), (0, 255, 0, 255));
}

#[tokio::test]
async fn test_last_loaded_document_wins() {
    let manager = CanvasManager::new(50.0, 50.0).unwrap();
    let mut session = Session::new();
    session.set_document(RED_BANNER_SVG);
    session.set_document(fallback_svg(
        r##"<rect width="50" height="50" fill="#0000ff"/>"##,
    ));

    manager.render_everything(&session).await;
    let frame = manager.snapshot().await;
    assert_eq!(rgba_at(&frame, 25, 25), (0, 0, 255, 255));
}

#[tokio::test]
async fn test_export_png_matches_backing_resolution() {
    let manager = CanvasManager::new(64.0, 32.0).unwrap();
    let mut session = Session::new();
    session.set_document(RED_BANNER_SVG);
    manager.render_everything(&session).await;

    let data = manager.export_png().await.unwrap();
    let decoder = png::Decoder::new(std::io::Cursor::new(data));
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 64);
    assert_eq!(reader.info().height, 32);
}

#[tokio::test]
async fn test_resize_then_render_recenters() {
    let manager = CanvasManager::new(100.0, 100.0).unwrap();
    let mut session = Session::new();
    session.set_document(RED_BANNER_SVG);
    manager.render_everything(&session).await;

    assert!(manager.resize_surface(200.0, 100.0).await);
    manager.render_everything(&session).await;

    // 100x50 doc on 200x100: scale 2, no letterbox at all.
    let frame = manager.snapshot().await;
    assert_eq!(frame.width(), 200);
    assert_eq!(rgba_at(&frame, 5, 5).3, 255);
    assert_eq!(rgba_at(&frame, 195, 95).3, 255);
}
