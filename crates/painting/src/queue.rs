//! Lookahead buffer between touch events and curve building
//!
//! Touch samples arrive at an irregular rate; the curve for segment
//! `[q0, q1]` needs `q2` to shape its end tangent, so samples are held back
//! until that lookahead exists. The last dequeued sample is kept as the
//! anchor for the start tangent of the next segment.

use tracing::warn;

use crate::types::Point2D;

/// Four samples handed to the curve builder: `[prev, start, end, next]`
pub type SegmentWindow = [Point2D; 4];

/// Bounded FIFO of touch samples
#[derive(Debug, Clone)]
pub struct SampleQueue {
    samples: Vec<Point2D>,
    capacity: usize,
    last_dequeued: Point2D,
    refreshed: bool,
}

impl SampleQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            last_dequeued: Point2D::ZERO,
            refreshed: false,
        }
    }

    /// Drop everything and seed the tangent anchor for a new stroke
    pub fn reset(&mut self, anchor: Point2D) {
        self.samples.clear();
        self.last_dequeued = anchor;
        self.refreshed = false;
    }

    /// Append a sample
    ///
    /// The caller drains the queue every frame, so reaching capacity is a
    /// logic error: debug builds assert, release builds drop the oldest
    /// sample (it becomes the tangent anchor) and keep going.
    pub fn push(&mut self, point: Point2D) {
        if self.samples.len() >= self.capacity {
            debug_assert!(
                false,
                "SampleQueue overflow: capacity {} reached",
                self.capacity
            );
            warn!(
                "SampleQueue overflow at capacity {}, dropping oldest sample",
                self.capacity
            );
            self.last_dequeued = self.samples.remove(0);
        }
        self.samples.push(point);
        self.refreshed = true;
    }

    /// Window with full lookahead, available once three samples are queued
    pub fn ready_window(&self) -> Option<SegmentWindow> {
        match self.samples.as_slice() {
            [start, end, next, ..] => Some([self.last_dequeued, *start, *end, *next]),
            _ => None,
        }
    }

    /// Window without lookahead, used when no sample arrived this pass
    ///
    /// The segment end stands in for the missing next sample. A single
    /// queued sample is the start of a segment that has no end yet, so it
    /// yields nothing.
    pub fn stale_window(&self) -> Option<SegmentWindow> {
        if self.refreshed {
            return None;
        }
        self.drain_window()
    }

    /// Next window regardless of freshness, with whatever lookahead exists
    pub fn drain_window(&self) -> Option<SegmentWindow> {
        match self.samples.as_slice() {
            [start, end, next, ..] => Some([self.last_dequeued, *start, *end, *next]),
            [start, end] => Some([self.last_dequeued, *start, *end, *end]),
            _ => None,
        }
    }

    /// Retire the front sample after its segment was processed
    pub fn advance(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        self.last_dequeued = self.samples.remove(0);
    }

    /// Drop queued samples, keeping the anchor
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// End of a processing pass
    pub fn clear_refreshed(&mut self) {
        self.refreshed = false;
    }

    pub fn is_refreshed(&self) -> bool {
        self.refreshed
    }

    pub fn last_dequeued(&self) -> Point2D {
        self.last_dequeued
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> &[Point2D] {
        &self.samples
    }
}
