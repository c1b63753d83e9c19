/// Number of texels in a precomputed gradient lookup strip.
pub const GRADIENT_STRIP_WIDTH: usize = 128;

/// Canvas background (opaque white).
pub const CANVAS_CLEAR_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Flat colour painted in erase mode instead of the gradient lookup.
pub const ERASE_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Edge hardness of the round brush mask.
pub const BRUSH_MASK_HARDNESS: f32 = 0.35;

/// Stroke length is divided by this before sampling width noise.
pub const NOISE_SEED_SCALE: f32 = 100.0;

/// Lower bound added to noise so noisy stamps never vanish completely.
pub const NOISE_WIDTH_FLOOR: f32 = 0.2;

/// Upper bound on stamps emitted for one segment.
pub const MAX_SEGMENT_STAMPS: usize = 4096;
