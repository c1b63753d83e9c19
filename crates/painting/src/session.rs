//! Touch-driven stroke session
//!
//! Owns the sample queue and per-stroke state and is driven by three kinds
//! of input: touch events, a per-frame processing pass, and time. It never
//! touches a surface; callers composite the returned stamps themselves.

use doodle_config::StrokeTuning;
use tracing::{debug, trace, warn};

use crate::brush::{StrokeBuilder, StrokeState};
use crate::queue::{SampleQueue, SegmentWindow};
use crate::types::{BrushStamp, Point2D};

/// Stroke state machine for a single pointer
#[derive(Debug, Clone)]
pub struct StrokeSession {
    queue: SampleQueue,
    state: StrokeState,
    builder: StrokeBuilder,
    active: bool,
}

impl Default for StrokeSession {
    fn default() -> Self {
        Self::new(StrokeTuning::default())
    }
}

impl StrokeSession {
    pub fn new(tuning: StrokeTuning) -> Self {
        Self {
            queue: SampleQueue::new(tuning.queue_capacity),
            state: StrokeState::default(),
            builder: StrokeBuilder::new(tuning),
            active: false,
        }
    }

    /// Start a stroke, discarding anything left from the previous one
    pub fn on_touch_down(&mut self, point: Point2D, now_ms: u64) {
        if self.active {
            debug!("StrokeSession: touch-down during active stroke, restarting");
        }
        self.state = StrokeState::begin(point, now_ms);
        self.queue.reset(point);
        self.queue.push(point);
        self.active = true;
    }

    /// Queue a move sample for the active stroke
    ///
    /// Moves can arrive faster than frames. Once the queue is one short of
    /// capacity the ready segments are drawn here instead of waiting for
    /// the next `process_ready`, so a burst never overflows it.
    pub fn push_sample(&mut self, point: Point2D, now_ms: u64) -> Vec<BrushStamp> {
        if !self.active {
            debug!("StrokeSession: move without touch-down, ignoring");
            return Vec::new();
        }
        self.queue.push(point);
        if self.queue.len() + 1 >= self.queue.capacity() {
            trace!(
                "StrokeSession: queue at {} of {}, draining early",
                self.queue.len(),
                self.queue.capacity()
            );
            return self.process_ready(now_ms);
        }
        Vec::new()
    }

    /// Process every segment that has its full lookahead
    pub fn process_ready(&mut self, now_ms: u64) -> Vec<BrushStamp> {
        let mut stamps = Vec::new();
        while let Some(window) = self.queue.ready_window() {
            stamps.extend(self.process_window(&window, now_ms));
            self.queue.advance();
        }
        stamps
    }

    /// Draw one segment without lookahead if no sample arrived this pass
    ///
    /// Ends the processing pass either way, so the next call flushes unless
    /// a sample is pushed in between.
    pub fn flush_if_stale(&mut self, now_ms: u64) -> Vec<BrushStamp> {
        let stamps = match self.queue.stale_window() {
            Some(window) => {
                let stamps = self.process_window(&window, now_ms);
                self.queue.advance();
                stamps
            }
            None => Vec::new(),
        };
        self.queue.clear_refreshed();
        stamps
    }

    /// Finish the stroke
    ///
    /// Remaining queued segments are drawn so the stroke reaches the lift
    /// point. A touch that never moved far enough becomes a single tap
    /// stamp at the touch-down point.
    pub fn on_touch_up(&mut self, now_ms: u64) -> Vec<BrushStamp> {
        if !self.active {
            return Vec::new();
        }

        let mut stamps = Vec::new();
        while let Some(window) = self.queue.drain_window() {
            stamps.extend(self.process_window(&window, now_ms));
            self.queue.advance();
        }

        if !self.state.moved {
            let tap = self.builder.tap_stamp(&self.state, now_ms);
            debug!(
                "StrokeSession: tap at ({:.1}, {:.1}), width={:.1}",
                tap.position.x, tap.position.y, tap.width
            );
            stamps.push(tap);
        }

        self.queue.clear();
        self.queue.clear_refreshed();
        self.active = false;
        stamps
    }

    /// Drop the in-flight stroke without producing output
    pub fn discard(&mut self) {
        if self.active {
            debug!(
                "StrokeSession: discarding stroke with {} queued samples",
                self.queue.len()
            );
        }
        self.queue.clear();
        self.queue.clear_refreshed();
        self.state = StrokeState::default();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn queue(&self) -> &SampleQueue {
        &self.queue
    }

    pub fn tuning(&self) -> &StrokeTuning {
        self.builder.tuning()
    }

    fn process_window(&mut self, window: &SegmentWindow, now_ms: u64) -> Vec<BrushStamp> {
        match self.builder.process_segment(&mut self.state, window, now_ms) {
            Ok(stamps) => stamps,
            Err(e) => {
                warn!("StrokeSession: skipping segment: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_vertical_drag_without_dwell() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(100.0, 100.0), 0);
        session.push_sample(Vec2::new(100.0, 180.0), 0);

        // Not enough lookahead yet; the frame ends with a stale flush
        assert!(session.process_ready(0).is_empty());
        assert!(session.flush_if_stale(0).is_empty());

        // Nothing new arrived: the segment is drawn without lookahead
        let stamps = session.flush_if_stale(0);
        assert!(session.state().moved);
        assert!((session.state().width - 25.0).abs() < 1e-5);
        assert!(!stamps.is_empty());
        assert!(stamps.iter().all(|s| (s.position.x - 100.0).abs() < 1e-3));

        let tail = session.on_touch_up(32);
        assert!(tail.is_empty());
        assert!(!session.is_active());
    }

    #[test]
    fn test_dwell_then_lift_is_a_tap() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(50.0, 50.0), 1_000);
        session.process_ready(1_300);
        session.flush_if_stale(1_300);

        let stamps = session.on_touch_up(1_600);
        assert_eq!(stamps.len(), 1);
        assert_eq!(stamps[0].position, Vec2::new(50.0, 50.0));
        assert!((stamps[0].width - 75.0).abs() < 1e-5);
    }

    #[test]
    fn test_jitter_below_threshold_is_a_tap() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(50.0, 50.0), 0);
        session.push_sample(Vec2::new(52.0, 51.0), 0);
        session.push_sample(Vec2::new(53.0, 49.0), 0);
        session.push_sample(Vec2::new(51.0, 50.0), 0);
        assert!(session.process_ready(10).is_empty());

        let stamps = session.on_touch_up(10);
        assert_eq!(stamps.len(), 1);
        assert_eq!(stamps[0].position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_process_ready_keeps_lookahead() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);
        for y in [40.0, 80.0, 120.0] {
            session.push_sample(Vec2::new(0.0, y), 0);
        }

        let stamps = session.process_ready(0);
        assert!(!stamps.is_empty());
        // Two segments drawn, the last two samples wait for lookahead
        assert_eq!(session.queue().len(), 2);
        assert_eq!(session.queue().last_dequeued(), Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_touch_up_draws_to_lift_point() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);
        for y in [40.0, 80.0, 120.0] {
            session.push_sample(Vec2::new(0.0, y), 0);
        }
        session.process_ready(0);

        let tail = session.on_touch_up(0);
        let last = tail.last().map(|s| s.position).unwrap_or(Vec2::ZERO);
        assert!(last.distance(Vec2::new(0.0, 120.0)) < 1e-3);
        assert!(session.queue().is_empty());
    }

    #[test]
    fn test_stamps_are_contiguous_across_segments() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);
        let mut stamps = Vec::new();
        for i in 1..=8 {
            stamps.extend(session.push_sample(Vec2::new(i as f32 * 30.0, (i % 2) as f32 * 10.0), i * 16));
            stamps.extend(session.process_ready(i * 16));
        }
        stamps.extend(session.on_touch_up(200));

        let spacing = session.tuning().stamp_spacing(session.state().width);
        for pair in stamps.windows(2) {
            // Segment joins may repeat a point, never leave a gap much wider than spacing
            assert!(pair[0].position.distance(pair[1].position) < spacing * 2.0);
        }
    }

    #[test]
    fn test_new_touch_discards_previous_queue() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);
        session.push_sample(Vec2::new(0.0, 50.0), 0);

        session.on_touch_down(Vec2::new(300.0, 300.0), 100);
        assert_eq!(session.queue().samples(), &[Vec2::new(300.0, 300.0)]);
        assert!(!session.state().moved);
        assert_eq!(session.state().cumulative_length, 0.0);
    }

    #[test]
    fn test_nan_sample_is_skipped() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);
        session.push_sample(Vec2::new(f32::NAN, 10.0), 0);
        session.push_sample(Vec2::new(0.0, 80.0), 0);
        session.push_sample(Vec2::new(0.0, 120.0), 0);

        let stamps = session.process_ready(0);
        assert!(stamps.iter().all(|s| s.position.is_finite()));
        assert_eq!(session.queue().len(), 2);
    }

    #[test]
    fn test_discard_produces_nothing() {
        let mut session = StrokeSession::default();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);
        session.push_sample(Vec2::new(0.0, 50.0), 0);
        session.discard();

        assert!(!session.is_active());
        assert!(session.queue().is_empty());
        assert!(session.on_touch_up(100).is_empty());
        session.push_sample(Vec2::new(1.0, 1.0), 0);
        assert!(session.queue().is_empty());
    }

    #[test]
    fn test_move_burst_between_frames_drains_early() {
        let mut session = StrokeSession::default();
        let capacity = session.queue().capacity();
        session.on_touch_down(Vec2::new(0.0, 0.0), 0);

        // Many more moves than the queue holds, with no frame in between
        let mut stamps = Vec::new();
        for i in 1..=(capacity * 3) {
            stamps.extend(session.push_sample(Vec2::new(0.0, i as f32 * 20.0), 16));
            assert!(session.queue().len() < capacity);
        }
        assert!(!stamps.is_empty());
        assert!(session.queue().is_refreshed());

        stamps.extend(session.process_ready(16));
        stamps.extend(session.on_touch_up(32));

        let spacing = session.tuning().stamp_spacing(session.state().width);
        for pair in stamps.windows(2) {
            assert!(pair[0].position.y <= pair[1].position.y + 1e-3);
            assert!(pair[0].position.distance(pair[1].position) < spacing * 2.0);
        }
        let last = stamps.last().map(|s| s.position).unwrap_or(Vec2::ZERO);
        assert!(last.distance(Vec2::new(0.0, capacity as f32 * 60.0)) < 1e-3);
    }
}
