//! Round brush stamp compositing

use tracing::trace;

use super::CpuSurface;
use crate::types::Point2D;

/// Pixel rectangle touched by a stamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CpuSurface {
    /// Composite a round stamp centred at `center`
    ///
    /// Coverage falls off toward the rim according to `hardness`. Returns the
    /// affected rectangle, or None if the stamp misses the surface.
    pub fn apply_stamp(
        &mut self,
        center: Point2D,
        diameter: f32,
        color: [u8; 4],
        hardness: f32,
    ) -> Option<StampRect> {
        let radius = diameter / 2.0;
        if !(radius > 0.0 && center.is_finite()) {
            return None;
        }

        let x_min = ((center.x - radius).floor().max(0.0) as u32).min(self.width);
        let y_min = ((center.y - radius).floor().max(0.0) as u32).min(self.height);
        let x_max = ((center.x + radius).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((center.y + radius).ceil().max(0.0) as u32).min(self.height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        for py in y_min..y_max {
            for px in x_min..x_max {
                // Pixel centre
                let dx = (px as f32 + 0.5) - center.x;
                let dy = (py as f32 + 0.5) - center.y;
                let distance_normalized = (dx * dx + dy * dy).sqrt() / radius;
                if distance_normalized > 1.0 {
                    continue;
                }

                let coverage = calculate_hardness_falloff(distance_normalized, hardness);
                if coverage > 0.0 {
                    self.blend_pixel(px, py, color, coverage);
                }
            }
        }

        let rect = StampRect {
            x: x_min,
            y: y_min,
            width: x_max - x_min,
            height: y_max - y_min,
        };
        trace!(
            "CpuSurface::apply_stamp: center=({:.1}, {:.1}), diameter={:.1} -> {:?}",
            center.x, center.y, diameter, rect
        );
        Some(rect)
    }
}

/// Calculate falloff based on hardness
/// distance_normalized is 0 at center, 1 at edge
/// hardness is 0.0 (soft) to 1.0 (hard)
#[inline]
pub fn calculate_hardness_falloff(distance_normalized: f32, hardness: f32) -> f32 {
    if distance_normalized > 1.0 {
        return 0.0;
    }
    let hardness = hardness.clamp(0.0, 1.0);
    let soft = 1.0 - distance_normalized.max(0.0);
    soft * (1.0 - hardness) + hardness
}
