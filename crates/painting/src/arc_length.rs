//! Arc-length parameterisation of a cubic segment
//!
//! The segment is sampled at evenly spaced parameters and the chord lengths
//! are accumulated. Between samples, arc length is treated as linear in
//! `t`, which is accurate enough for segments a few dozen pixels long.

use crate::math::{clamp01, lerp, CubicSegment};

/// One sample of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLengthEntry {
    /// Accumulated arc length from the segment start
    pub length: f32,
    /// Curve parameter at this sample
    pub t: f32,
}

/// Cumulative arc length against curve parameter for one segment
///
/// Rebuilt for every segment; lengths are non-decreasing by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable {
    entries: Vec<ArcLengthEntry>,
}

impl ArcLengthTable {
    /// Sample `segment` at `precision` parameters `i / (precision - 1)`
    pub fn build(segment: &CubicSegment, precision: usize) -> Self {
        let precision = precision.max(2);
        let mut entries = Vec::with_capacity(precision);
        entries.push(ArcLengthEntry { length: 0.0, t: 0.0 });

        let mut previous_point = segment.a;
        let mut length = 0.0;
        for i in 1..precision {
            let t = i as f32 / (precision - 1) as f32;
            let point = segment.point_at(t);
            length += point.distance(previous_point);
            entries.push(ArcLengthEntry { length, t });
            previous_point = point;
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[ArcLengthEntry] {
        &self.entries
    }

    pub fn total_length(&self) -> f32 {
        self.entries.last().map(|e| e.length).unwrap_or(0.0)
    }

    /// Curve parameter at which the accumulated length reaches `target`
    ///
    /// Finds the first entry whose length is at least `target` and
    /// interpolates inside the bracket ending there. The result is clamped
    /// to `[0, 1]` since the search can overshoot by float error at the
    /// table ends.
    pub fn parameter_at(&self, target: f32) -> f32 {
        let total = self.total_length();
        let target = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, total)
        };

        let index = self
            .entries
            .partition_point(|entry| entry.length < target)
            .min(self.entries.len() - 1);
        if index == 0 {
            return self.entries[0].t;
        }

        let previous = self.entries[index - 1];
        let next = self.entries[index];
        let span = next.length - previous.length;
        let local = if span > 0.0 {
            (target - previous.length) / span
        } else {
            0.0
        };

        clamp01(lerp(previous.t, next.t, local))
    }
}
