//! Input routing - touch and key events to strokes and menu actions

use doodle_config::InputConfig;
use glam::Vec2;
use painting::{BrushMode, GradientPreset, PaintingPipeline};
use tracing::{debug, info};

use crate::view::{ViewController, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Move,
    Up,
}

/// Single-pointer touch sample in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub position: Vec2,
    /// Platform uptime clock
    pub timestamp_ms: u64,
}

impl TouchEvent {
    pub fn down(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(TouchAction::Down, x, y, timestamp_ms)
    }

    pub fn moved(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(TouchAction::Move, x, y, timestamp_ms)
    }

    pub fn up(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(TouchAction::Up, x, y, timestamp_ms)
    }

    fn new(action: TouchAction, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            action,
            position: Vec2::new(x, y),
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Back { pressed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Touch(TouchEvent),
    Key(KeyEvent),
}

impl InputEvent {
    pub fn timestamp_ms(&self) -> Option<u64> {
        match self {
            InputEvent::Touch(touch) => Some(touch.timestamp_ms),
            InputEvent::Key(_) => None,
        }
    }
}

/// What an event ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    Stroke,
    ClearedCanvas(GradientPreset),
    ToggledView(ViewState),
}

/// Routes events to the pipeline depending on the current view
#[derive(Debug, Clone)]
pub struct InputRouter {
    double_tap_threshold_ms: u64,
    last_touch_down_ms: Option<u64>,
}

impl InputRouter {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            double_tap_threshold_ms: config.double_tap_threshold_ms,
            last_touch_down_ms: None,
        }
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        view: &mut ViewController,
        pipeline: &mut PaintingPipeline,
    ) -> InputOutcome {
        match event {
            InputEvent::Touch(touch) => self.handle_touch(touch, view, pipeline),
            InputEvent::Key(KeyEvent::Back { pressed: true }) => InputOutcome::Ignored,
            InputEvent::Key(KeyEvent::Back { pressed: false }) => {
                if view.state() == ViewState::Draw && pipeline.is_stroking() {
                    pipeline.cancel_stroke();
                }
                InputOutcome::ToggledView(view.toggle())
            }
        }
    }

    fn handle_touch(
        &mut self,
        touch: &TouchEvent,
        view: &ViewController,
        pipeline: &mut PaintingPipeline,
    ) -> InputOutcome {
        match touch.action {
            TouchAction::Down => {
                let previous_down = self.last_touch_down_ms.replace(touch.timestamp_ms);
                if view.state() != ViewState::Draw {
                    return InputOutcome::Ignored;
                }

                let double_tap = previous_down.is_some_and(|previous| {
                    touch.timestamp_ms.saturating_sub(previous) < self.double_tap_threshold_ms
                });
                if double_tap {
                    debug!("Double tap, switching to erase");
                    pipeline.set_brush_mode(BrushMode::Erase);
                }
                pipeline.begin_stroke(touch.position, touch.timestamp_ms);
                InputOutcome::Stroke
            }
            TouchAction::Move => {
                if view.state() != ViewState::Draw {
                    return InputOutcome::Ignored;
                }
                pipeline.stroke_to(touch.position, touch.timestamp_ms);
                InputOutcome::Stroke
            }
            TouchAction::Up => {
                let outcome = match view.state() {
                    ViewState::Draw => {
                        pipeline.end_stroke(touch.timestamp_ms);
                        InputOutcome::Stroke
                    }
                    ViewState::Menu if view.layout().clear_canvas.contains(touch.position) => {
                        let preset = pipeline.cycle_gradient();
                        info!("Clear canvas, gradient {:?}", preset);
                        InputOutcome::ClearedCanvas(preset)
                    }
                    _ => InputOutcome::Ignored,
                };
                // Erase lasts for one stroke
                pipeline.set_brush_mode(BrushMode::Draw);
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodle_config::{StrokeTuning, ViewConfig};

    fn setup() -> (InputRouter, ViewController, PaintingPipeline) {
        (
            InputRouter::new(&InputConfig::default()),
            ViewController::new(&ViewConfig::default(), 720, 1280),
            PaintingPipeline::new(720, 1280, StrokeTuning::default()),
        )
    }

    fn touch(event: TouchEvent) -> InputEvent {
        InputEvent::Touch(event)
    }

    #[test]
    fn test_drag_strokes_in_draw_view() {
        let (mut router, mut view, mut pipeline) = setup();
        let outcome = router.handle(&touch(TouchEvent::down(100.0, 100.0, 0)), &mut view, &mut pipeline);
        assert_eq!(outcome, InputOutcome::Stroke);
        assert!(pipeline.is_stroking());

        router.handle(&touch(TouchEvent::moved(100.0, 180.0, 16)), &mut view, &mut pipeline);
        router.handle(&touch(TouchEvent::up(100.0, 180.0, 32)), &mut view, &mut pipeline);
        assert!(!pipeline.is_stroking());
    }

    #[test]
    fn test_double_tap_erases_for_one_stroke() {
        let (mut router, mut view, mut pipeline) = setup();
        router.handle(&touch(TouchEvent::down(50.0, 50.0, 1_000)), &mut view, &mut pipeline);
        router.handle(&touch(TouchEvent::up(50.0, 50.0, 1_100)), &mut view, &mut pipeline);
        assert_eq!(pipeline.brush_mode(), BrushMode::Draw);

        router.handle(&touch(TouchEvent::down(50.0, 50.0, 1_300)), &mut view, &mut pipeline);
        assert_eq!(pipeline.brush_mode(), BrushMode::Erase);

        router.handle(&touch(TouchEvent::up(50.0, 50.0, 1_400)), &mut view, &mut pipeline);
        assert_eq!(pipeline.brush_mode(), BrushMode::Draw);

        // Slow second tap stays in draw mode
        router.handle(&touch(TouchEvent::down(50.0, 50.0, 3_000)), &mut view, &mut pipeline);
        assert_eq!(pipeline.brush_mode(), BrushMode::Draw);
    }

    #[test]
    fn test_back_toggles_on_release_only() {
        let (mut router, mut view, mut pipeline) = setup();
        let pressed = InputEvent::Key(KeyEvent::Back { pressed: true });
        let released = InputEvent::Key(KeyEvent::Back { pressed: false });

        assert_eq!(router.handle(&pressed, &mut view, &mut pipeline), InputOutcome::Ignored);
        assert_eq!(view.state(), ViewState::Draw);

        assert_eq!(
            router.handle(&released, &mut view, &mut pipeline),
            InputOutcome::ToggledView(ViewState::TransitionToMenu)
        );
    }

    #[test]
    fn test_menu_clear_button() {
        let (mut router, mut view, mut pipeline) = setup();
        view.toggle();
        view.advance(1.0);
        assert_eq!(view.state(), ViewState::Menu);

        // Touches in the menu never start strokes
        router.handle(&touch(TouchEvent::down(360.0, 300.0, 0)), &mut view, &mut pipeline);
        assert!(!pipeline.is_stroking());

        let outcome = router.handle(&touch(TouchEvent::up(360.0, 300.0, 50)), &mut view, &mut pipeline);
        assert_eq!(outcome, InputOutcome::ClearedCanvas(GradientPreset::Meadow));

        let miss = router.handle(&touch(TouchEvent::up(10.0, 10.0, 100)), &mut view, &mut pipeline);
        assert_eq!(miss, InputOutcome::Ignored);
        assert_eq!(pipeline.gradient_preset(), GradientPreset::Meadow);
    }

    #[test]
    fn test_back_mid_stroke_cancels() {
        let (mut router, mut view, mut pipeline) = setup();
        router.handle(&touch(TouchEvent::down(100.0, 100.0, 0)), &mut view, &mut pipeline);
        router.handle(&InputEvent::Key(KeyEvent::Back { pressed: false }), &mut view, &mut pipeline);
        assert!(!pipeline.is_stroking());
    }
}
