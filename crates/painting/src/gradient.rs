//! Colour gradients and their precomputed lookup strips
//!
//! A gradient is a list of colour stops. Sampling clamps to the end stops
//! and interpolates in HSV between the bracketing stops, so hue always
//! takes the short way round the colour wheel. Since gradients only change
//! when the canvas is cleared, the renderer samples a [`GradientStrip`]
//! instead of evaluating HSV maths per stamp.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Hsv, Rgb};
use crate::constants::GRADIENT_STRIP_WIDTH;
use crate::math::clamp01;

/// A colour anchored at a position in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: Rgb,
    pub position: f32,
}

impl GradientStop {
    pub const fn new(color: Rgb, position: f32) -> Self {
        Self { color, position }
    }
}

/// Ordered list of colour stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Create a gradient; stops are sorted by position.
    ///
    /// Returns `None` for an empty stop list.
    pub fn new(mut stops: Vec<GradientStop>) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Some(Self { stops })
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Colour at `t`
    ///
    /// Values before the first stop or after the last return that stop's
    /// colour unchanged; there is no extrapolation.
    pub fn sample(&self, t: f32) -> Rgb {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if t.is_nan() || t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        // First stop strictly after t; exists because t < last.position
        let next_index = self
            .stops
            .iter()
            .position(|stop| stop.position > t)
            .unwrap_or(self.stops.len() - 1);
        let previous = self.stops[next_index - 1];
        let next = self.stops[next_index];

        let span = next.position - previous.position;
        let local_t = if span > 0.0 {
            (t - previous.position) / span
        } else {
            1.0
        };

        let hsv = Hsv::lerp(
            Hsv::from_rgb(previous.color),
            Hsv::from_rgb(next.color),
            local_t,
        );
        Rgb::from_hsv(hsv)
    }

    /// Precompute `width` evenly spaced samples covering `[0, 1]`
    pub fn to_strip(&self, width: usize) -> GradientStrip {
        let width = width.max(2);
        let texels = (0..width)
            .map(|i| {
                let t = i as f32 / (width - 1) as f32;
                self.sample(t).to_rgba8(255)
            })
            .collect();

        debug!(
            "Gradient::to_strip: {} stops -> {} texels",
            self.stops.len(),
            width
        );

        GradientStrip { texels }
    }
}

/// RGBA8 lookup table sampled from a [`Gradient`]
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStrip {
    texels: Vec<[u8; 4]>,
}

impl GradientStrip {
    /// Nearest texel for `t`, clamped to the strip ends
    pub fn lookup(&self, t: f32) -> [u8; 4] {
        let last = self.texels.len() - 1;
        let index = (clamp01(t) * last as f32).round() as usize;
        self.texels[index.min(last)]
    }

    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    /// Raw bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    pub fn len(&self) -> usize {
        self.texels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }
}

/// Built-in gradients, cycled each time the canvas is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GradientPreset {
    /// Rust red through cream to cyan
    #[default]
    Ember,
    /// Mint green through orange to lemon
    Meadow,
    /// Flat near-black with noisy width
    Ink,
}

impl GradientPreset {
    pub const ALL: [GradientPreset; 3] = [Self::Ember, Self::Meadow, Self::Ink];

    pub fn stops(self) -> Vec<GradientStop> {
        match self {
            Self::Ember => vec![
                GradientStop::new(Rgb::new(204.0 / 255.0, 38.0 / 255.0, 0.0), 0.3),
                GradientStop::new(Rgb::new(1.0, 230.0 / 255.0, 200.0 / 255.0), 0.45),
                GradientStop::new(Rgb::new(0.0, 230.0 / 255.0, 1.0), 0.6),
            ],
            Self::Meadow => vec![
                GradientStop::new(Rgb::new(0.352, 0.858, 0.556), 0.15),
                GradientStop::new(Rgb::new(1.0, 0.494, 0.176), 0.4),
                GradientStop::new(Rgb::new(1.0, 0.956, 0.301), 0.59),
            ],
            Self::Ink => vec![
                GradientStop::new(Rgb::new(0.06, 0.03, 0.05), 0.0),
                GradientStop::new(Rgb::new(0.06, 0.03, 0.05), 1.0),
            ],
        }
    }

    pub fn gradient(self) -> Gradient {
        Gradient {
            stops: self.stops(),
        }
    }

    /// Whether stamp width is modulated by noise along the stroke
    pub fn noisy_width(self) -> bool {
        matches!(self, Self::Ink)
    }

    /// Lookup strip at the default resolution
    pub fn strip(self) -> GradientStrip {
        self.gradient().to_strip(GRADIENT_STRIP_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stop() -> Gradient {
        Gradient::new(vec![
            GradientStop::new(Rgb::new(1.0, 0.0, 0.0), 0.3),
            GradientStop::new(Rgb::new(0.0, 1.0, 0.0), 0.45),
            GradientStop::new(Rgb::new(0.0, 0.0, 1.0), 0.6),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_gradient_rejected() {
        assert!(Gradient::new(Vec::new()).is_none());
    }

    #[test]
    fn test_clamps_outside_stops() {
        let gradient = three_stop();
        assert_eq!(gradient.sample(0.1), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(gradient.sample(0.9), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(gradient.sample(f32::NAN), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_preset_clamps_exactly() {
        let gradient = GradientPreset::Ember.gradient();
        let stops = GradientPreset::Ember.stops();
        assert_eq!(gradient.sample(0.1), stops[0].color);
        assert_eq!(gradient.sample(0.9), stops[2].color);
    }

    #[test]
    fn test_hits_stop_colors() {
        let gradient = three_stop();
        let mid = gradient.sample(0.45);
        assert!(mid.r.abs() < 1e-4);
        assert!((mid.g - 1.0).abs() < 1e-4);
        assert!(mid.b.abs() < 1e-4);
    }

    #[test]
    fn test_interpolates_in_hsv() {
        let gradient = three_stop();
        // Halfway between red (hue 0) and green (hue 2) is yellow (hue 1)
        let color = gradient.sample(0.375);
        assert!((color.r - 1.0).abs() < 1e-3);
        assert!((color.g - 1.0).abs() < 1e-3);
        assert!(color.b.abs() < 1e-3);
    }

    #[test]
    fn test_unsorted_stops_are_sorted() {
        let gradient = Gradient::new(vec![
            GradientStop::new(Rgb::new(0.0, 0.0, 1.0), 0.9),
            GradientStop::new(Rgb::new(1.0, 0.0, 0.0), 0.1),
        ])
        .unwrap();
        assert_eq!(gradient.stops()[0].position, 0.1);
        assert_eq!(gradient.sample(0.0), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_strip_ends_match_clamped_colors() {
        let strip = three_stop().to_strip(GRADIENT_STRIP_WIDTH);
        assert_eq!(strip.len(), GRADIENT_STRIP_WIDTH);
        assert_eq!(strip.texels()[0], [255, 0, 0, 255]);
        assert_eq!(strip.texels()[GRADIENT_STRIP_WIDTH - 1], [0, 0, 255, 255]);
        assert_eq!(strip.lookup(-1.0), [255, 0, 0, 255]);
        assert_eq!(strip.lookup(2.0), [0, 0, 255, 255]);
        assert_eq!(strip.as_bytes().len(), GRADIENT_STRIP_WIDTH * 4);
    }

    #[test]
    fn test_ink_is_flat_and_noisy() {
        let strip = GradientPreset::Ink.strip();
        let first = strip.texels()[0];
        assert!(strip.texels().iter().all(|t| *t == first));
        assert!(GradientPreset::Ink.noisy_width());
        assert!(!GradientPreset::Ember.noisy_width());
    }
}
