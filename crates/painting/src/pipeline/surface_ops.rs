//! Surface operations for the painting pipeline

use tracing::info;

use crate::constants::CANVAS_CLEAR_COLOR;
use crate::gradient::GradientPreset;
use crate::surface::CpuSurface;

use super::PaintingPipeline;

impl PaintingPipeline {
    /// Return and reset the redraw-needed flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Force a redraw, e.g. after the surface was restored
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the canvas to the background colour
    pub fn clear(&mut self) {
        self.surface.clear(CANVAS_CLEAR_COLOR);
        self.dirty = true;
    }

    /// Switch to the next gradient preset and start a fresh canvas
    pub fn cycle_gradient(&mut self) -> GradientPreset {
        if !self.gradients.is_empty() {
            self.gradient_index = (self.gradient_index + 1) % self.gradients.len();
        }
        self.session.discard();
        self.clear();

        let preset = self.gradient_preset();
        info!("Gradient switched to {:?}, canvas cleared", preset);
        preset
    }

    /// Use `preset` for subsequent stamps without touching the canvas
    pub fn select_gradient(&mut self, preset: GradientPreset) {
        if let Some(index) = self.gradients.iter().position(|(p, _)| *p == preset) {
            self.gradient_index = index;
        }
    }

    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut CpuSurface {
        &mut self.surface
    }
}
