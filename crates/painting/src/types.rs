use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen-space touch coordinate in pixels, origin top-left.
pub type Point2D = Vec2;

/// How stamps are coloured when composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BrushMode {
    /// Colour comes from the active gradient
    #[default]
    Draw = 0,
    /// Flat background colour
    Erase = 1,
}

/// A single brush stamp produced by the stroke builder
///
/// Stamps are produced and consumed within one frame and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStamp {
    /// Stamp centre in canvas pixels
    pub position: Point2D,
    /// Stamp diameter in pixels
    pub width: f32,
    /// Position in the colour gradient, 0.0-1.0
    pub gradient_t: f32,
    /// Stroke length at the start of the segment, drives width noise
    pub noise_seed: f32,
}

impl BrushStamp {
    pub fn new(position: Point2D, width: f32, gradient_t: f32, noise_seed: f32) -> Self {
        Self {
            position,
            width,
            gradient_t,
            noise_seed,
        }
    }
}
