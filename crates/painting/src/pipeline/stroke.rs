//! Stroke handling for the painting pipeline

use tracing::{debug, trace};

use crate::constants::{BRUSH_MASK_HARDNESS, ERASE_COLOR, NOISE_SEED_SCALE, NOISE_WIDTH_FLOOR};
use crate::noise::noise_1d;
use crate::surface::StampRect;
use crate::types::{BrushMode, BrushStamp, Point2D};

use super::PaintingPipeline;

impl PaintingPipeline {
    /// Begin a stroke at `point`
    pub fn begin_stroke(&mut self, point: Point2D, now_ms: u64) {
        debug!(
            "begin_stroke: ({:.1}, {:.1}) at {}ms, mode={:?}",
            point.x, point.y, now_ms, self.brush_mode
        );
        self.session.on_touch_down(point, now_ms);
    }

    /// Queue a move sample
    ///
    /// Usually nothing is drawn until `update`; a burst that fills the
    /// sample queue is drawn right away. Returns the stamp count.
    pub fn stroke_to(&mut self, point: Point2D, now_ms: u64) -> usize {
        let stamps = self.session.push_sample(point, now_ms);
        self.apply_stamps(&stamps)
    }

    /// Per-frame processing pass
    ///
    /// Draws every segment with full lookahead, then one stale segment if
    /// no sample arrived since the last pass. Returns the stamp count.
    pub fn update(&mut self, now_ms: u64) -> usize {
        let mut stamps = self.session.process_ready(now_ms);
        stamps.extend(self.session.flush_if_stale(now_ms));
        self.apply_stamps(&stamps)
    }

    /// End the current stroke, drawing up to the lift point
    pub fn end_stroke(&mut self, now_ms: u64) -> usize {
        let stamps = self.session.on_touch_up(now_ms);
        let count = self.apply_stamps(&stamps);
        debug!("end_stroke: {} final stamps", count);
        count
    }

    /// Drop the current stroke without drawing its queued samples
    ///
    /// Stamps already composited stay on the canvas.
    pub fn cancel_stroke(&mut self) {
        self.session.discard();
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.session.is_active()
    }

    /// Colour, size and composite one stamp
    pub fn apply_stamp(&mut self, stamp: &BrushStamp) -> Option<StampRect> {
        let (preset, strip) = self.gradients.get(self.gradient_index)?;

        let color = match self.brush_mode {
            BrushMode::Draw => strip.lookup(stamp.gradient_t),
            BrushMode::Erase => ERASE_COLOR,
        };

        let mut diameter = stamp.width;
        if self.brush_mode == BrushMode::Draw && preset.noisy_width() {
            let noise = noise_1d(stamp.noise_seed / NOISE_SEED_SCALE);
            diameter *= (noise + NOISE_WIDTH_FLOOR) / (1.0 + NOISE_WIDTH_FLOOR);
        }

        let rect = self
            .surface
            .apply_stamp(stamp.position, diameter, color, BRUSH_MASK_HARDNESS);
        match rect {
            Some(rect) => {
                self.dirty = true;
                trace!("apply_stamp: {:?}", rect);
            }
            None => trace!(
                "apply_stamp: ({:.1}, {:.1}) outside surface",
                stamp.position.x,
                stamp.position.y
            ),
        }
        rect
    }

    fn apply_stamps(&mut self, stamps: &[BrushStamp]) -> usize {
        for stamp in stamps {
            self.apply_stamp(stamp);
        }
        stamps.len()
    }
}
