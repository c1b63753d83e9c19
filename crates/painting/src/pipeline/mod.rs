//! Complete painting pipeline
//!
//! Connects touch input to the canvas:
//! - Stroke session (samples to stamps)
//! - Gradient lookup and width noise (stamp appearance)
//! - CPU surface (stamp compositing)
//!
//! Owned by whichever thread renders; it holds no platform handles.

mod stroke;
mod surface_ops;

use doodle_config::StrokeTuning;

use crate::constants::CANVAS_CLEAR_COLOR;
use crate::gradient::{GradientPreset, GradientStrip};
use crate::session::StrokeSession;
use crate::surface::CpuSurface;
use crate::types::BrushMode;

/// Complete painting pipeline for a canvas
///
/// 1. Input comes in via `begin_stroke`, `stroke_to`, `end_stroke`
/// 2. `update` runs the per-frame processing pass
/// 3. Stamps are coloured from the active gradient and composited
/// 4. A dirty flag tells the presenter to redraw
pub struct PaintingPipeline {
    /// CPU surface for painting
    pub surface: CpuSurface,
    pub(crate) session: StrokeSession,
    /// Lookup strips, one per preset, in `GradientPreset::ALL` order
    pub(crate) gradients: Vec<(GradientPreset, GradientStrip)>,
    pub(crate) gradient_index: usize,
    pub(crate) brush_mode: BrushMode,
    pub(crate) dirty: bool,
}

impl PaintingPipeline {
    /// Create a pipeline with a white canvas of the given size
    pub fn new(width: u32, height: u32, tuning: StrokeTuning) -> Self {
        let mut surface = CpuSurface::new(width, height);
        surface.clear(CANVAS_CLEAR_COLOR);

        let gradients = GradientPreset::ALL
            .iter()
            .map(|preset| (*preset, preset.strip()))
            .collect();

        Self {
            surface,
            session: StrokeSession::new(tuning),
            gradients,
            gradient_index: 0,
            brush_mode: BrushMode::Draw,
            dirty: true,
        }
    }

    /// Get the surface width
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    /// Get the surface height
    pub fn height(&self) -> u32 {
        self.surface.height
    }

    pub fn set_brush_mode(&mut self, mode: BrushMode) {
        self.brush_mode = mode;
    }

    pub fn brush_mode(&self) -> BrushMode {
        self.brush_mode
    }

    /// Preset currently used for colouring stamps
    pub fn gradient_preset(&self) -> GradientPreset {
        self.gradients
            .get(self.gradient_index)
            .map(|(preset, _)| *preset)
            .unwrap_or_default()
    }

    pub fn session(&self) -> &StrokeSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ERASE_COLOR;
    use glam::Vec2;

    fn pipeline() -> PaintingPipeline {
        PaintingPipeline::new(256, 256, StrokeTuning::default())
    }

    fn painted_pixels(pipeline: &PaintingPipeline) -> usize {
        pipeline
            .surface
            .pixels()
            .iter()
            .filter(|p| **p != CANVAS_CLEAR_COLOR)
            .count()
    }

    #[test]
    fn test_pipeline_creation() {
        let mut pipeline = pipeline();
        assert_eq!(pipeline.width(), 256);
        assert_eq!(pipeline.height(), 256);
        assert_eq!(pipeline.gradient_preset(), GradientPreset::Ember);
        assert_eq!(painted_pixels(&pipeline), 0);
        assert!(pipeline.take_dirty());
        assert!(!pipeline.take_dirty());
    }

    #[test]
    fn test_pipeline_stroke() {
        let mut pipeline = pipeline();
        pipeline.take_dirty();

        pipeline.begin_stroke(Vec2::new(100.0, 100.0), 0);
        assert!(pipeline.is_stroking());

        pipeline.stroke_to(Vec2::new(100.0, 140.0), 8);
        pipeline.stroke_to(Vec2::new(100.0, 180.0), 16);
        pipeline.update(16);
        pipeline.end_stroke(32);

        assert!(!pipeline.is_stroking());
        assert!(pipeline.take_dirty());
        assert!(painted_pixels(&pipeline) > 0);
        // Stroke runs along x = 100
        assert_ne!(pipeline.surface.get_pixel(100, 150), Some(CANVAS_CLEAR_COLOR));
        assert_eq!(pipeline.surface.get_pixel(10, 10), Some(CANVAS_CLEAR_COLOR));
    }

    #[test]
    fn test_stroke_burst_larger_than_queue() {
        let mut pipeline = pipeline();
        let capacity = pipeline.session().tuning().queue_capacity;
        pipeline.begin_stroke(Vec2::new(20.0, 10.0), 0);

        let mut drawn = 0;
        for i in 1..=(capacity * 2) {
            drawn += pipeline.stroke_to(Vec2::new(20.0, 10.0 + i as f32 * 10.0), 16);
        }
        assert!(drawn > 0);
        pipeline.update(16);
        pipeline.end_stroke(32);

        // No gap along the line
        let end = 10 + capacity as u32 * 20;
        for y in 12..end {
            assert_ne!(pipeline.surface.get_pixel(20, y), Some(CANVAS_CLEAR_COLOR), "gap at y={}", y);
        }
    }

    #[test]
    fn test_pipeline_tap() {
        let mut pipeline = pipeline();
        pipeline.begin_stroke(Vec2::new(50.0, 50.0), 0);
        pipeline.update(300);
        pipeline.end_stroke(600);

        assert_ne!(pipeline.surface.get_pixel(50, 50), Some(CANVAS_CLEAR_COLOR));
        // Full-dwell tap: 75px wide
        assert_ne!(pipeline.surface.get_pixel(50, 80), Some(CANVAS_CLEAR_COLOR));
    }

    #[test]
    fn test_pipeline_cancel_stroke() {
        let mut pipeline = pipeline();
        pipeline.begin_stroke(Vec2::new(100.0, 100.0), 0);
        pipeline.stroke_to(Vec2::new(100.0, 180.0), 16);
        pipeline.cancel_stroke();
        pipeline.update(16);
        pipeline.end_stroke(32);

        assert!(!pipeline.is_stroking());
        assert_eq!(painted_pixels(&pipeline), 0);
    }

    #[test]
    fn test_erase_paints_background() {
        let mut pipeline = pipeline();
        pipeline.begin_stroke(Vec2::new(60.0, 60.0), 0);
        pipeline.end_stroke(500);
        assert!(painted_pixels(&pipeline) > 0);

        pipeline.set_brush_mode(BrushMode::Erase);
        pipeline.begin_stroke(Vec2::new(60.0, 60.0), 1_000);
        pipeline.end_stroke(1_500);
        let pixel = pipeline.surface.get_pixel(60, 60).unwrap();
        assert!(pixel.iter().zip(ERASE_COLOR).all(|(p, e)| (*p as i32 - e as i32).abs() <= 4));
    }

    #[test]
    fn test_cycle_gradient_clears_and_wraps() {
        let mut pipeline = pipeline();
        pipeline.begin_stroke(Vec2::new(60.0, 60.0), 0);
        pipeline.end_stroke(500);
        pipeline.take_dirty();

        assert_eq!(pipeline.cycle_gradient(), GradientPreset::Meadow);
        assert_eq!(painted_pixels(&pipeline), 0);
        assert!(pipeline.take_dirty());

        assert_eq!(pipeline.cycle_gradient(), GradientPreset::Ink);
        assert_eq!(pipeline.cycle_gradient(), GradientPreset::Ember);
    }

    #[test]
    fn test_select_gradient_keeps_canvas() {
        let mut pipeline = pipeline();
        pipeline.begin_stroke(Vec2::new(60.0, 60.0), 0);
        pipeline.end_stroke(500);
        let painted = painted_pixels(&pipeline);

        pipeline.select_gradient(GradientPreset::Ink);
        assert_eq!(pipeline.gradient_preset(), GradientPreset::Ink);
        assert_eq!(painted_pixels(&pipeline), painted);
    }
}
