//! Render thread
//!
//! Owns everything stateful: the painting pipeline, the attached window and
//! input queue, and the view. The UI thread only reaches it through the
//! command channel and the input queue it hands over.

use std::mem;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use doodle_config::AppConfig;
use painting::{CanvasStore, GradientPreset, PaintingPipeline};
use tracing::{debug, info, trace, warn};

use crate::command::{
    command_channel, Ack, CommandEnvelope, InputReceiver, LifecycleHandle, Payload, WindowHandle,
};
use crate::error::AppError;
use crate::input::{InputEvent, InputOutcome, InputRouter};
use crate::lifecycle::{transition, AppCommand, Effect, LifecycleState};
use crate::view::ViewController;

/// Version byte leading the saved instance state
pub const SAVED_STATE_VERSION: u8 = 1;

/// Counters reported when the render thread exits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    pub presents: u64,
    pub commands: u64,
    pub canvas_saves: u32,
    pub canvas_restores: u32,
    pub ignored_events: u64,
}

pub struct RenderThread {
    config: AppConfig,
    store: CanvasStore,
    commands: Receiver<CommandEnvelope>,
    input: Option<InputReceiver>,
    window: Option<WindowHandle>,
    pipeline: Option<PaintingPipeline>,
    router: InputRouter,
    view: ViewController,
    gradient: GradientPreset,
    state: LifecycleState,
    running: bool,
    saved_state: Option<Vec<u8>>,
    /// Latest input timestamp; strokes are timed on the input clock
    input_clock_ms: u64,
    stats: RenderStats,
}

impl RenderThread {
    /// Start the render thread in the detached state
    pub fn spawn(
        config: AppConfig,
        store: CanvasStore,
    ) -> Result<(LifecycleHandle, JoinHandle<RenderStats>), AppError> {
        let (handle, commands) = command_channel();
        let render = Self::new(config, store, commands);
        let join = thread::Builder::new()
            .name("doodle-render".into())
            .spawn(move || render.run())
            .map_err(AppError::Spawn)?;
        Ok((handle, join))
    }

    fn new(config: AppConfig, store: CanvasStore, commands: Receiver<CommandEnvelope>) -> Self {
        let router = InputRouter::new(&config.input);
        let (width, height) = config.display.physical_size();
        let view = ViewController::new(&config.view, width, height);
        Self {
            config,
            store,
            commands,
            input: None,
            window: None,
            pipeline: None,
            router,
            view,
            gradient: GradientPreset::default(),
            state: LifecycleState::Detached,
            running: true,
            saved_state: None,
            input_clock_ms: 0,
            stats: RenderStats::default(),
        }
    }

    fn run(mut self) -> RenderStats {
        info!("Render thread started");
        let frame_interval = Duration::from_millis(self.config.frame_interval_ms.max(1));
        let mut last_frame = Instant::now();

        while self.running {
            match self.commands.recv_timeout(frame_interval) {
                Ok(envelope) => self.handle_command(envelope),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Command channel closed, stopping render thread");
                    self.discard_stroke();
                    break;
                }
            }
            while self.running {
                match self.commands.try_recv() {
                    Ok(envelope) => self.handle_command(envelope),
                    Err(_) => break,
                }
            }
            if !self.running {
                break;
            }

            self.drain_input();
            self.frame();

            let now = Instant::now();
            self.view.advance((now - last_frame).as_secs_f32());
            last_frame = now;
        }

        info!("Render thread stopped: {:?}", self.stats);
        self.stats
    }

    fn handle_command(&mut self, envelope: CommandEnvelope) {
        let CommandEnvelope {
            command,
            mut payload,
            mut ack,
        } = envelope;
        let step = transition(self.state, command);
        info!(
            "Lifecycle: {:?} in {:?} -> {:?}",
            command, self.state, step.next
        );
        self.stats.commands += 1;

        for effect in step.effects {
            self.apply_effect(*effect, command, &mut payload, &mut ack);
        }
        // Commands whose row has no acknowledgement still release a blocked sender
        if let Some(ack) = ack.take() {
            reply(ack, Ack::Done);
        }
        self.state = step.next;
    }

    fn apply_effect(
        &mut self,
        effect: Effect,
        command: AppCommand,
        payload: &mut Payload,
        ack: &mut Option<Sender<Ack>>,
    ) {
        trace!("Effect {:?}", effect);
        match effect {
            Effect::SwapInputQueue => match mem::take(payload) {
                Payload::InputQueue(queue) => {
                    let status = if queue.is_some() { "attached" } else { "detached" };
                    debug!("Input queue {}", status);
                    self.input = queue;
                }
                other => warn!("SwapInputQueue with unexpected payload {:?}", other),
            },
            Effect::AttachWindow => match mem::take(payload) {
                Payload::Window(Some(window)) => {
                    info!("Window attached: {}x{}", window.width, window.height);
                    self.view.relayout(window.width, window.height);
                    self.window = Some(window);
                }
                other => warn!("AttachWindow with unexpected payload {:?}", other),
            },
            Effect::InitRenderer => self.init_renderer(),
            Effect::RestoreCanvas => self.restore_canvas(),
            Effect::SaveCanvas => self.save_canvas(),
            Effect::ReleaseRenderer => {
                if self.pipeline.take().is_some() {
                    info!("Renderer released");
                }
            }
            Effect::DetachWindow => {
                self.window = None;
            }
            Effect::ReloadConfig => {
                if let Some(window) = self.window {
                    self.view.relayout(window.width, window.height);
                }
                debug!("Configuration changed, layout refreshed");
            }
            Effect::FreeSavedState => {
                if self.saved_state.take().is_some() {
                    debug!("Saved instance state freed");
                }
            }
            Effect::DiscardStroke => self.discard_stroke(),
            Effect::StopRunning => {
                self.running = false;
            }
            Effect::Acknowledge => {
                if let Some(ack) = ack.take() {
                    let message = if command == AppCommand::SaveState {
                        let snapshot = self.snapshot();
                        self.saved_state = Some(snapshot.clone());
                        Ack::SavedState(snapshot)
                    } else {
                        Ack::Done
                    };
                    reply(ack, message);
                }
            }
        }
    }

    fn init_renderer(&mut self) {
        let Some(window) = self.window else {
            warn!("InitRenderer without a window");
            return;
        };
        if self.pipeline.is_some() {
            return;
        }
        let mut pipeline =
            PaintingPipeline::new(window.width, window.height, self.config.stroke.clone());
        pipeline.select_gradient(self.gradient);
        self.pipeline = Some(pipeline);
        info!("Renderer initialized at {}x{}", window.width, window.height);
    }

    fn restore_canvas(&mut self) {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        match self.store.load_into(pipeline.surface_mut()) {
            Ok(true) => {
                pipeline.mark_dirty();
                self.stats.canvas_restores += 1;
            }
            Ok(false) => debug!("No stored canvas, starting blank"),
            Err(e) => warn!("Canvas restore failed, starting blank: {}", e),
        }
    }

    fn save_canvas(&mut self) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };
        match self.store.save(pipeline.surface()) {
            Ok(()) => self.stats.canvas_saves += 1,
            Err(e) => warn!("Canvas save failed: {}", e),
        }
    }

    fn discard_stroke(&mut self) {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.cancel_stroke();
        }
    }

    fn snapshot(&self) -> Vec<u8> {
        let gradient = GradientPreset::ALL
            .iter()
            .position(|preset| *preset == self.gradient)
            .unwrap_or(0);
        vec![SAVED_STATE_VERSION, gradient as u8]
    }

    fn drain_input(&mut self) {
        let Some(input) = self.input.as_ref() else {
            return;
        };
        let events: Vec<InputEvent> = input.try_iter().collect();
        if events.is_empty() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_mut() else {
            debug!("Dropping {} input events while detached", events.len());
            self.stats.ignored_events += events.len() as u64;
            return;
        };

        for event in &events {
            if let Some(timestamp_ms) = event.timestamp_ms() {
                self.input_clock_ms = self.input_clock_ms.max(timestamp_ms);
            }
            if let InputOutcome::ClearedCanvas(preset) =
                self.router.handle(event, &mut self.view, pipeline)
            {
                self.gradient = preset;
            }
        }
    }

    fn frame(&mut self) {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        self.stats.frames += 1;

        let stamps = pipeline.update(self.input_clock_ms);
        if pipeline.take_dirty() {
            self.stats.presents += 1;
            trace!(
                "Present: {} new stamps, view at {:.2} (eased {:.2})",
                stamps,
                self.view.view_position(),
                self.view.tweened_position()
            );
        }
    }
}

fn reply(ack: Sender<Ack>, message: Ack) {
    if ack.send(message).is_err() {
        debug!("Acknowledgement dropped, requester is gone");
    }
}
