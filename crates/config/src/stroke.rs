//! Stroke tuning constants
//!
//! Every number the stroke pipeline depends on lives here so that the
//! painting crate can be driven with explicit values in tests.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default brush width for a stroke drawn without dwelling first
pub const DEFAULT_MIN_BRUSH_SIZE: f32 = 25.0;

/// Default brush width after dwelling for `max_brush_size_time_ms`
pub const DEFAULT_MAX_BRUSH_SIZE: f32 = 75.0;

/// Default dwell time that yields the widest brush
pub const DEFAULT_MAX_BRUSH_SIZE_TIME_MS: f32 = 500.0;

/// Default segment length at which a touch stops being a tap
pub const DEFAULT_START_MOVE_THRESHOLD: f32 = 10.0;

/// Default segment length that maps to the end of the colour gradient
pub const DEFAULT_MAX_STROKE_LENGTH_FOR_COLOR: f32 = 50.0;

/// Default tangent scale (roughly a third, halved to average in and out tangents)
pub const DEFAULT_TANGENT_SCALE: f32 = 0.16;

/// Default number of samples in the per-segment arc-length table
pub const DEFAULT_ARC_LENGTH_PRECISION: usize = 10;

/// Default stamp density (stamp spacing is `width / stamp_density`)
pub const DEFAULT_STAMP_DENSITY: f32 = 10.0;

/// Default exponential smoothing factor for the colour selection
pub const DEFAULT_COLOR_SMOOTHING: f32 = 0.2;

/// Default capacity of the touch sample queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Tunables for converting touch samples into brush stamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeTuning {
    /// Brush width with zero dwell time
    pub min_brush_size: f32,
    /// Brush width at or beyond `max_brush_size_time_ms` of dwell
    pub max_brush_size: f32,
    /// Dwell time (ms) mapped to `max_brush_size`
    pub max_brush_size_time_ms: f32,
    /// Segment length (px) that turns a tap candidate into a stroke
    pub start_move_threshold: f32,
    /// Segment arc length (px) normalised to colour selection 1.0
    pub max_stroke_length_for_color: f32,
    /// Controls curve tightness of the Hermite tangents
    pub tangent_scale: f32,
    /// Samples per arc-length table
    pub arc_length_precision: usize,
    /// Stamps per brush width of arc length
    pub stamp_density: f32,
    /// Fraction of the way the colour selection moves per segment
    pub color_smoothing: f32,
    /// Maximum buffered touch samples
    pub queue_capacity: usize,
}

impl Default for StrokeTuning {
    fn default() -> Self {
        Self {
            min_brush_size: DEFAULT_MIN_BRUSH_SIZE,
            max_brush_size: DEFAULT_MAX_BRUSH_SIZE,
            max_brush_size_time_ms: DEFAULT_MAX_BRUSH_SIZE_TIME_MS,
            start_move_threshold: DEFAULT_START_MOVE_THRESHOLD,
            max_stroke_length_for_color: DEFAULT_MAX_STROKE_LENGTH_FOR_COLOR,
            tangent_scale: DEFAULT_TANGENT_SCALE,
            arc_length_precision: DEFAULT_ARC_LENGTH_PRECISION,
            stamp_density: DEFAULT_STAMP_DENSITY,
            color_smoothing: DEFAULT_COLOR_SMOOTHING,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl StrokeTuning {
    /// Arc length between consecutive stamps for a brush of `width`
    pub fn stamp_spacing(&self, width: f32) -> f32 {
        width / self.stamp_density
    }

    /// Check that the values can drive the stroke pipeline
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.min_brush_size) {
            return Err(ConfigError::Invalid(format!(
                "min_brush_size must be positive, got {}",
                self.min_brush_size
            )));
        }
        if self.max_brush_size < self.min_brush_size {
            return Err(ConfigError::Invalid(format!(
                "max_brush_size {} is smaller than min_brush_size {}",
                self.max_brush_size, self.min_brush_size
            )));
        }
        if !is_positive(self.max_brush_size_time_ms) {
            return Err(ConfigError::Invalid(
                "max_brush_size_time_ms must be positive".to_string(),
            ));
        }
        if !is_positive(self.max_stroke_length_for_color) {
            return Err(ConfigError::Invalid(
                "max_stroke_length_for_color must be positive".to_string(),
            ));
        }
        if !is_positive(self.stamp_density) {
            return Err(ConfigError::Invalid(
                "stamp_density must be positive".to_string(),
            ));
        }
        if self.arc_length_precision < 2 {
            return Err(ConfigError::Invalid(format!(
                "arc_length_precision needs at least 2 samples, got {}",
                self.arc_length_precision
            )));
        }
        if !(0.0..=1.0).contains(&self.color_smoothing) {
            return Err(ConfigError::Invalid(format!(
                "color_smoothing must be within [0, 1], got {}",
                self.color_smoothing
            )));
        }
        // Three queued samples plus headroom for one more push per frame
        if self.queue_capacity < 4 {
            return Err(ConfigError::Invalid(format!(
                "queue_capacity must be at least 4, got {}",
                self.queue_capacity
            )));
        }
        Ok(())
    }
}

pub(crate) fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
