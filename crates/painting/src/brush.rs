//! Stroke curve builder
//!
//! Turns a window of four touch samples into brush stamps placed at even
//! arc-length spacing along a cubic through the middle two samples. Width
//! is decided once per stroke from how long the finger dwelled before
//! moving; colour advances with each segment's own length and is smoothed
//! between segments.

use doodle_config::StrokeTuning;
use tracing::{debug, warn};

use crate::arc_length::ArcLengthTable;
use crate::constants::MAX_SEGMENT_STAMPS;
use crate::math::{clamp01, lerp, CubicSegment};
use crate::queue::SegmentWindow;
use crate::types::{BrushStamp, Point2D};
use crate::validation::{validate_window, SegmentError};

/// Per-touch stroke state, reset on every touch-down
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeState {
    /// Set once a segment exceeds the start-move threshold
    pub moved: bool,
    /// Fixed when `moved` becomes true
    pub width: f32,
    /// Arc length drawn so far in this stroke
    pub cumulative_length: f32,
    /// Smoothed gradient position, 0.0-1.0
    pub color_selection: f32,
    pub touch_down_position: Point2D,
    pub touch_down_ms: u64,
}

impl StrokeState {
    /// Fresh state for a touch-down at `position`
    pub fn begin(position: Point2D, now_ms: u64) -> Self {
        Self {
            touch_down_position: position,
            touch_down_ms: now_ms,
            ..Default::default()
        }
    }

    /// Milliseconds since touch-down
    pub fn dwell_ms(&self, now_ms: u64) -> f32 {
        now_ms.saturating_sub(self.touch_down_ms) as f32
    }
}

/// Builds stamps for one segment at a time
#[derive(Debug, Clone, Default)]
pub struct StrokeBuilder {
    tuning: StrokeTuning,
}

impl StrokeBuilder {
    pub fn new(tuning: StrokeTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &StrokeTuning {
        &self.tuning
    }

    /// Brush width after dwelling `dwell_ms` before moving
    pub fn width_for_dwell(&self, dwell_ms: f32) -> f32 {
        let t = clamp01(dwell_ms / self.tuning.max_brush_size_time_ms);
        lerp(self.tuning.min_brush_size, self.tuning.max_brush_size, t)
    }

    /// Gradient position reached by a segment of `length`
    pub fn color_selection_for_length(&self, length: f32) -> f32 {
        clamp01(length / self.tuning.max_stroke_length_for_color)
    }

    /// Process the segment `[window[1], window[2]]`
    ///
    /// While the stroke has not moved, segments shorter than the start-move
    /// threshold produce nothing. Non-finite input is rejected before any
    /// state is touched.
    pub fn process_segment(
        &self,
        state: &mut StrokeState,
        window: &SegmentWindow,
        now_ms: u64,
    ) -> Result<Vec<BrushStamp>, SegmentError> {
        validate_window(window)?;
        let [prev, start, end, next] = *window;

        let chord = start.distance(end);
        if !state.moved && chord < self.tuning.start_move_threshold {
            return Ok(Vec::new());
        }

        let segment =
            CubicSegment::from_hermite(prev, start, end, next, self.tuning.tangent_scale);
        let table = ArcLengthTable::build(&segment, self.tuning.arc_length_precision);
        let total_length = table.total_length();
        if !total_length.is_finite() {
            return Err(SegmentError::NonFiniteLength(total_length));
        }

        if !state.moved {
            state.moved = true;
            state.width = self.width_for_dwell(state.dwell_ms(now_ms));
            state.color_selection = self.color_selection_for_length(chord);
            debug!(
                "StrokeBuilder: stroke started moving, width={:.1}, colour={:.2}",
                state.width, state.color_selection
            );
        }

        let start_selection = state.color_selection;
        let end_selection = self.color_selection_for_length(total_length);
        let noise_seed = state.cumulative_length;
        let stamp_at = |t: f32| {
            BrushStamp::new(
                segment.point_at(t),
                state.width,
                lerp(start_selection, end_selection, t),
                noise_seed,
            )
        };

        let stamps = match self.dot_count(total_length, state.width) {
            0 => Vec::new(),
            // One stamp goes to the segment end; the start was covered by the previous segment
            1 => vec![stamp_at(1.0)],
            count => {
                let last = (count - 1) as f32;
                (0..count)
                    .map(|i| {
                        let target_length = i as f32 / last * total_length;
                        stamp_at(table.parameter_at(target_length))
                    })
                    .collect()
            }
        };

        state.cumulative_length += total_length;
        state.color_selection = lerp(
            state.color_selection,
            end_selection,
            self.tuning.color_smoothing,
        );

        if !stamps.is_empty() {
            debug!(
                "StrokeBuilder: {} stamps over {:.1}px from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                stamps.len(),
                total_length,
                start.x,
                start.y,
                end.x,
                end.y
            );
        }

        Ok(stamps)
    }

    /// Number of stamps for a segment: `floor(length / (width / density))`
    pub fn dot_count(&self, total_length: f32, width: f32) -> usize {
        let spacing = self.tuning.stamp_spacing(width);
        if !(spacing > 0.0 && total_length > 0.0) {
            return 0;
        }
        let count = (total_length / spacing).floor();
        if count > MAX_SEGMENT_STAMPS as f32 {
            warn!(
                "StrokeBuilder: {:.0} stamps requested for one segment, capping at {}",
                count, MAX_SEGMENT_STAMPS
            );
            return MAX_SEGMENT_STAMPS;
        }
        count as usize
    }

    /// The single stamp for a touch that never moved
    pub fn tap_stamp(&self, state: &StrokeState, now_ms: u64) -> BrushStamp {
        BrushStamp::new(
            state.touch_down_position,
            self.width_for_dwell(state.dwell_ms(now_ms)),
            0.0,
            0.0,
        )
    }
}
