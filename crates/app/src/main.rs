//! Doodle - finger painting host
//!
//! Runs the render thread without a display and drives it the way the
//! platform glue would: window and input queue hand-over, touches, the back
//! key, and a detach/re-attach round trip through the canvas dump.

mod command;
mod error;
mod input;
mod lifecycle;
mod render;
mod view;

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use doodle_config::AppConfig;
use painting::CanvasStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use command::{input_channel, LifecycleHandle, WindowHandle};
use error::AppError;
use input::{InputEvent, KeyEvent, TouchEvent};
use lifecycle::AppCommand;
use render::{RenderStats, RenderThread};

/// Input events the UI thread may queue ahead of the render thread
const INPUT_QUEUE_CAPACITY: usize = 256;

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(stats) => {
            info!(
                "Session finished: {} frames, {} presents, {} commands, {} saves, {} restores, {} ignored events",
                stats.frames,
                stats.presents,
                stats.commands,
                stats.canvas_saves,
                stats.canvas_restores,
                stats.ignored_events
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("doodle: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> Result<RenderStats, AppError> {
    let config = AppConfig::from_env()?;
    let (width, height) = config.display.physical_size();
    info!(
        "Starting Doodle at {}x{}, canvas file {}",
        width,
        height,
        config.canvas_file.display()
    );

    let window = WindowHandle::new(width, height);
    let frame = Duration::from_millis(config.frame_interval_ms.max(1));
    let transition = Duration::from_secs_f32(config.view.transition_duration_s) + frame * 4;
    let store = CanvasStore::new(&config.canvas_file);

    let (handle, join) = RenderThread::spawn(config, store)?;
    let (events, queue) = input_channel(INPUT_QUEUE_CAPACITY);

    handle.notify(AppCommand::Start)?;
    handle.notify(AppCommand::Resume)?;
    handle.set_input_queue(Some(queue))?;
    handle.set_window(Some(window))?;
    handle.notify(AppCommand::GainedFocus)?;

    let mut script = Script::new(events, frame);
    let (w, h) = (window.width as f32, window.height as f32);

    // Dwell, then lift: a single wide stamp
    script.touch(TouchEvent::down(w * 0.5, h * 0.3, script.now_ms))?;
    script.advance(400);
    script.touch(TouchEvent::up(w * 0.5, h * 0.3, script.now_ms))?;

    // Wavy drag down the canvas
    script.advance(800);
    script.drag(FingerPath::wave(w * 0.15, h * 0.45, w * 0.7, 24))?;

    // Double tap: the second stroke erases across the drag
    script.advance(800);
    script.touch(TouchEvent::down(w * 0.5, h * 0.35, script.now_ms))?;
    script.advance(80);
    script.touch(TouchEvent::up(w * 0.5, h * 0.35, script.now_ms))?;
    script.advance(120);
    script.drag(FingerPath::line(w * 0.5, h * 0.35, w * 0.5, h * 0.6, 16))?;

    // Menu: clear the canvas and switch gradient, then back to drawing
    script.key(KeyEvent::Back { pressed: true })?;
    script.key(KeyEvent::Back { pressed: false })?;
    thread::sleep(transition);
    let (clear_x, clear_y) = (w * 0.5, h * 3.0 / 11.0);
    script.touch(TouchEvent::down(clear_x, clear_y, script.now_ms))?;
    script.touch(TouchEvent::up(clear_x, clear_y, script.now_ms))?;
    script.key(KeyEvent::Back { pressed: true })?;
    script.key(KeyEvent::Back { pressed: false })?;
    thread::sleep(transition);

    script.advance(800);
    script.drag(FingerPath::wave(w * 0.2, h * 0.7, w * 0.6, 20))?;

    // Backgrounded: canvas goes to the dump file and comes back
    handle.notify(AppCommand::Pause)?;
    let saved = handle.save_instance_state()?;
    info!("Saved instance state: {} bytes", saved.len());
    handle.set_window(None)?;
    handle.notify(AppCommand::Stop)?;

    handle.notify(AppCommand::Start)?;
    handle.set_window(Some(window))?;
    handle.notify(AppCommand::Resume)?;
    for command in [
        AppCommand::WindowResized,
        AppCommand::ContentRectChanged,
        AppCommand::WindowRedrawNeeded,
        AppCommand::ConfigChanged,
        AppCommand::LowMemory,
    ] {
        handle.notify(command)?;
    }

    shutdown(&handle)?;
    join.join().map_err(|_| AppError::RenderThreadPanicked)
}

fn shutdown(handle: &LifecycleHandle) -> Result<(), AppError> {
    handle.notify(AppCommand::LostFocus)?;
    handle.set_input_queue(None)?;
    handle.destroy()
}

/// Timed input feed on a synthetic uptime clock
struct Script {
    events: Sender<InputEvent>,
    frame: Duration,
    now_ms: u64,
}

impl Script {
    fn new(events: Sender<InputEvent>, frame: Duration) -> Self {
        Self {
            events,
            frame,
            now_ms: 0,
        }
    }

    fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    fn send(&self, event: InputEvent) -> Result<(), AppError> {
        self.events
            .send(event)
            .map_err(|_| AppError::RenderThreadGone)?;
        // Let the render thread run a pass per event
        thread::sleep(self.frame);
        Ok(())
    }

    fn touch(&self, event: TouchEvent) -> Result<(), AppError> {
        self.send(InputEvent::Touch(event))
    }

    fn key(&self, event: KeyEvent) -> Result<(), AppError> {
        self.send(InputEvent::Key(event))
    }

    fn drag(&mut self, path: FingerPath) -> Result<(), AppError> {
        let mut points = path.points.into_iter();
        let Some((x, y)) = points.next() else {
            return Ok(());
        };
        self.touch(TouchEvent::down(x, y, self.now_ms))?;

        let (mut last_x, mut last_y) = (x, y);
        for (x, y) in points {
            self.advance(16);
            self.touch(TouchEvent::moved(x, y, self.now_ms))?;
            (last_x, last_y) = (x, y);
        }
        self.advance(16);
        self.touch(TouchEvent::up(last_x, last_y, self.now_ms))
    }
}

/// Scripted finger path
struct FingerPath {
    points: Vec<(f32, f32)>,
}

impl FingerPath {
    fn line(x0: f32, y0: f32, x1: f32, y1: f32, samples: usize) -> Self {
        let samples = samples.max(2);
        let points = (0..samples)
            .map(|i| {
                let t = i as f32 / (samples - 1) as f32;
                (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
            })
            .collect();
        Self { points }
    }

    fn wave(x0: f32, y0: f32, width: f32, samples: usize) -> Self {
        let samples = samples.max(2);
        let points = (0..samples)
            .map(|i| {
                let t = i as f32 / (samples - 1) as f32;
                (x0 + width * t, y0 + (t * std::f32::consts::TAU * 2.0).sin() * 60.0)
            })
            .collect();
        Self { points }
    }
}
