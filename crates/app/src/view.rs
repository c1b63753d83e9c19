//! Draw/menu view switching
//!
//! The menu slides in over the canvas. `view_position` runs from 0.0 (draw)
//! to 1.0 (menu) at a constant rate and is eased with smoothstep for
//! display.

use doodle_config::ViewConfig;
use glam::Vec2;
use tracing::debug;

/// Draw view position
pub const DRAW_VIEW_POSITION: f32 = 0.0;

/// Menu view position
pub const MENU_VIEW_POSITION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Draw,
    Menu,
    TransitionToDraw,
    TransitionToMenu,
}

/// Axis-aligned button rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRect {
    pub position: Vec2,
    pub size: Vec2,
}

impl ButtonRect {
    /// Strictly inside; touches on the border miss
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.position + self.size;
        point.x > self.position.x && point.x < max.x && point.y > self.position.y && point.y < max.y
    }
}

/// Menu buttons laid out relative to the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    pub clear_canvas: ButtonRect,
}

impl MenuLayout {
    pub fn for_window(width: u32, height: u32) -> Self {
        let width = width as f32;
        let height = height as f32;
        Self {
            clear_canvas: ButtonRect {
                position: Vec2::new(width / 3.0, height / 11.0),
                size: Vec2::new(width / 3.0, height * 4.0 / 11.0),
            },
        }
    }
}

/// Current view and transition progress
#[derive(Debug, Clone)]
pub struct ViewController {
    state: ViewState,
    view_position: f32,
    transition_duration_s: f32,
    layout: MenuLayout,
}

impl ViewController {
    pub fn new(config: &ViewConfig, width: u32, height: u32) -> Self {
        Self {
            state: ViewState::Draw,
            view_position: DRAW_VIEW_POSITION,
            transition_duration_s: config.transition_duration_s,
            layout: MenuLayout::for_window(width, height),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn view_position(&self) -> f32 {
        self.view_position
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    pub fn relayout(&mut self, width: u32, height: u32) {
        self.layout = MenuLayout::for_window(width, height);
    }

    /// Start sliding toward the other view; ignored mid-transition
    pub fn toggle(&mut self) -> ViewState {
        self.state = match self.state {
            ViewState::Draw => ViewState::TransitionToMenu,
            ViewState::Menu => ViewState::TransitionToDraw,
            in_transition => in_transition,
        };
        debug!("View toggled -> {:?}", self.state);
        self.state
    }

    /// Advance a running transition by `elapsed_s` seconds
    pub fn advance(&mut self, elapsed_s: f32) {
        let step = if self.transition_duration_s > 0.0 {
            elapsed_s / self.transition_duration_s
        } else {
            f32::INFINITY
        };

        match self.state {
            ViewState::TransitionToMenu => {
                self.view_position += step;
                if self.view_position >= MENU_VIEW_POSITION {
                    self.view_position = MENU_VIEW_POSITION;
                    self.state = ViewState::Menu;
                }
            }
            ViewState::TransitionToDraw => {
                self.view_position -= step;
                if self.view_position <= DRAW_VIEW_POSITION {
                    self.view_position = DRAW_VIEW_POSITION;
                    self.state = ViewState::Draw;
                }
            }
            ViewState::Draw | ViewState::Menu => {}
        }
    }

    /// Eased position for display
    pub fn tweened_position(&self) -> f32 {
        smoothstep(self.view_position)
    }
}

/// Cubic ease-in-out on `[0, 1]`
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ViewController {
        ViewController::new(&ViewConfig::default(), 720, 1280)
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert!(smoothstep(0.25) < 0.25);
        assert_eq!(smoothstep(2.0), 1.0);
    }

    #[test]
    fn test_transition_to_menu_and_back() {
        let mut view = controller();
        assert_eq!(view.toggle(), ViewState::TransitionToMenu);

        view.advance(0.2);
        assert_eq!(view.state(), ViewState::TransitionToMenu);
        assert!((view.view_position() - 0.5).abs() < 1e-5);

        view.advance(0.3);
        assert_eq!(view.state(), ViewState::Menu);
        assert_eq!(view.view_position(), MENU_VIEW_POSITION);

        assert_eq!(view.toggle(), ViewState::TransitionToDraw);
        view.advance(1.0);
        assert_eq!(view.state(), ViewState::Draw);
        assert_eq!(view.tweened_position(), 0.0);
    }

    #[test]
    fn test_toggle_ignored_mid_transition() {
        let mut view = controller();
        view.toggle();
        view.advance(0.1);
        assert_eq!(view.toggle(), ViewState::TransitionToMenu);
    }

    #[test]
    fn test_clear_button_layout() {
        let layout = MenuLayout::for_window(720, 1280);
        assert_eq!(layout.clear_canvas.position, Vec2::new(240.0, 1280.0 / 11.0));
        assert_eq!(layout.clear_canvas.size, Vec2::new(240.0, 1280.0 * 4.0 / 11.0));

        assert!(layout.clear_canvas.contains(Vec2::new(360.0, 300.0)));
        assert!(!layout.clear_canvas.contains(Vec2::new(240.0, 300.0)));
        assert!(!layout.clear_canvas.contains(Vec2::new(360.0, 1000.0)));
    }
}
