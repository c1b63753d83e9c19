//! RGB and HSV colour conversions
//!
//! Hue is expressed in sextants, `[0, 6)`, so each primary/secondary
//! colour sits on an integer.

use serde::{Deserialize, Serialize};

use crate::math::lerp;

/// Number of hue sextants in a full turn
const HUE_TURN: f32 = 6.0;

/// Linear RGB colour with components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Hue (sextants), saturation and value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 0-255 channel values
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn min_component(&self) -> f32 {
        self.r.min(self.g).min(self.b)
    }

    pub fn max_component(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Convert back from HSV
    pub fn from_hsv(hsv: Hsv) -> Self {
        let h = hsv.h.rem_euclid(HUE_TURN);
        let c = hsv.s * hsv.v;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = hsv.v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::new(r + m, g + m, b + m)
    }

    /// Quantise to RGBA8 with the given alpha
    pub fn to_rgba8(&self, alpha: u8) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b), alpha]
    }
}

impl Hsv {
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Convert from RGB; greys get hue 0
    pub fn from_rgb(rgb: Rgb) -> Self {
        let min = rgb.min_component();
        let max = rgb.max_component();
        let delta = max - min;

        let h = if delta <= f32::EPSILON {
            0.0
        } else if max == rgb.r {
            ((rgb.g - rgb.b) / delta).rem_euclid(HUE_TURN)
        } else if max == rgb.g {
            (rgb.b - rgb.r) / delta + 2.0
        } else {
            (rgb.r - rgb.g) / delta + 4.0
        };

        let s = if max > 0.0 { delta / max } else { 0.0 };

        Self::new(h, s, max)
    }

    /// Interpolate hue along the shorter arc, saturation and value linearly
    pub fn lerp(a: Hsv, b: Hsv, t: f32) -> Hsv {
        let mut delta = b.h - a.h;
        if delta > HUE_TURN / 2.0 {
            delta -= HUE_TURN;
        } else if delta < -HUE_TURN / 2.0 {
            delta += HUE_TURN;
        }

        Hsv {
            h: (a.h + delta * t).rem_euclid(HUE_TURN),
            s: lerp(a.s, b.s, t),
            v: lerp(a.v, b.v, t),
        }
    }
}
