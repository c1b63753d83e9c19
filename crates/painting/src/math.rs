//! Scalar and 2D curve helpers

use crate::types::Point2D;

/// Linear interpolation, `t = 0` gives `a`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// Clamp to the unit interval
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Evaluate a cubic Bezier with de Casteljau's construction
pub fn cubic_bezier(a: Point2D, b: Point2D, c: Point2D, d: Point2D, t: f32) -> Point2D {
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    let cd = c.lerp(d, t);

    let abc = ab.lerp(bc, t);
    let bcd = bc.lerp(cd, t);

    abc.lerp(bcd, t)
}

/// Cubic Bezier segment drawn between the middle two of four touch samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub a: Point2D,
    pub b: Point2D,
    pub c: Point2D,
    pub d: Point2D,
}

impl CubicSegment {
    /// Build the segment `[start, end]` with tangents averaged from the
    /// neighbouring samples.
    ///
    /// `prev` and `next` only steer the tangents and are never drawn to.
    /// The Hermite tangents become offsets of the two interior control points.
    pub fn from_hermite(
        prev: Point2D,
        start: Point2D,
        end: Point2D,
        next: Point2D,
        tangent_scale: f32,
    ) -> Self {
        let start_in = start - prev;
        let start_out = end - start;
        let start_tangent = (start_in + start_out) * tangent_scale;

        let end_in = start_out;
        let end_out = next - end;
        let end_tangent = (end_in + end_out) * tangent_scale;

        Self {
            a: start,
            b: start + start_tangent,
            c: end - end_tangent,
            d: end,
        }
    }

    /// Point on the curve; `t` is clamped to `[0, 1]`
    pub fn point_at(&self, t: f32) -> Point2D {
        cubic_bezier(self.a, self.b, self.c, self.d, clamp01(t))
    }
}
