//! Doodle painting - touch strokes to brush stamps to pixels
//!
//! This crate is platform-agnostic; time and tuning are passed in:
//! - [`queue`] - Lookahead buffer of touch samples
//! - [`math`], [`arc_length`] - Hermite/Bezier segments and arc-length tables
//! - [`brush`] - Per-segment stamp placement, dwell width and colour smoothing
//! - [`session`] - Touch-down / move / touch-up state machine
//! - [`color`], [`gradient`], [`noise`] - Stamp appearance
//! - [`surface`] - CPU RGBA8 canvas and stamp compositing
//! - [`pipeline`] - Complete painting pipeline
//! - [`persistence`] - Canvas save/restore across surface loss

pub mod arc_length;
pub mod brush;
pub mod color;
pub mod constants;
pub mod gradient;
pub mod math;
pub mod noise;
pub mod persistence;
pub mod pipeline;
pub mod queue;
pub mod session;
pub mod surface;
pub mod types;
pub mod validation;

pub use arc_length::*;
pub use brush::*;
pub use color::*;
pub use constants::*;
pub use gradient::*;
pub use math::*;
pub use noise::*;
pub use persistence::*;
pub use pipeline::*;
pub use queue::*;
pub use session::*;
pub use surface::*;
pub use types::*;
pub use validation::*;
