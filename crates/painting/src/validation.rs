use thiserror::Error;

use crate::queue::SegmentWindow;
use crate::types::Point2D;

#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    #[error("Non-finite touch sample at window index {index}: ({x}, {y})")]
    NonFiniteSample { index: usize, x: f32, y: f32 },
    #[error("Non-finite arc length: {0}")]
    NonFiniteLength(f32),
}

/// Check a single touch sample
pub fn is_valid_sample(point: Point2D) -> bool {
    point.is_finite()
}

/// Validate all four samples of a segment window
pub fn validate_window(window: &SegmentWindow) -> Result<(), SegmentError> {
    for (index, point) in window.iter().enumerate() {
        if !is_valid_sample(*point) {
            return Err(SegmentError::NonFiniteSample {
                index,
                x: point.x,
                y: point.y,
            });
        }
    }
    Ok(())
}
