//! Deterministic 1D value noise for stamp width modulation

use crate::math::lerp;

/// Hash an integer lattice coordinate to `[0, 1]`
#[inline]
fn lattice_value(i: i32) -> f32 {
    let mut x = i as u32;
    x = (x ^ 61) ^ (x >> 16);
    x = x.wrapping_mul(9);
    x ^= x >> 4;
    x = x.wrapping_mul(0x27d4_eb2d);
    x ^= x >> 15;
    (x & 0x00ff_ffff) as f32 / 0x00ff_ffff as f32
}

/// Smooth value noise in `[0, 1]`
///
/// Continuous in `x`, equal to the lattice hash at integer inputs.
pub fn noise_1d(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    let cell = x.floor();
    let f = x - cell;
    let u = f * f * (3.0 - 2.0 * f);
    let i = cell as i32;
    lerp(lattice_value(i), lattice_value(i.wrapping_add(1)), u)
}
