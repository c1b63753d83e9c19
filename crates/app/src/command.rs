//! UI thread to render thread command channel
//!
//! A command that changes what the render thread owns (window, input queue,
//! saved state, teardown) is a rendezvous: the UI thread sends an envelope
//! carrying a one-slot reply channel and blocks until the render thread has
//! applied the command's effects and acknowledged it.

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::debug;

use crate::error::AppError;
use crate::input::InputEvent;
use crate::lifecycle::AppCommand;

/// Pending commands the UI thread may queue before blocking
pub const COMMAND_QUEUE_CAPACITY: usize = 16;

/// Native window stand-in: the drawable size the platform handed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle {
    pub width: u32,
    pub height: u32,
}

impl WindowHandle {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Receiving end of an input queue attached to the render thread
pub type InputReceiver = Receiver<InputEvent>;

/// Value handed over with a command
#[derive(Debug, Default)]
pub enum Payload {
    #[default]
    None,
    Window(Option<WindowHandle>),
    InputQueue(Option<InputReceiver>),
}

/// Reply sent when a command's effects have been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    Done,
    SavedState(Vec<u8>),
}

#[derive(Debug)]
pub struct CommandEnvelope {
    pub command: AppCommand,
    pub payload: Payload,
    /// Present when the sender is blocked waiting for the reply
    pub ack: Option<Sender<Ack>>,
}

/// Create the command channel
pub fn command_channel() -> (LifecycleHandle, Receiver<CommandEnvelope>) {
    let (tx, rx) = bounded(COMMAND_QUEUE_CAPACITY);
    (LifecycleHandle { tx }, rx)
}

/// Create an input queue to attach with [`LifecycleHandle::set_input_queue`]
pub fn input_channel(capacity: usize) -> (Sender<InputEvent>, InputReceiver) {
    bounded(capacity)
}

/// UI-side handle to the render thread
#[derive(Debug, Clone)]
pub struct LifecycleHandle {
    tx: Sender<CommandEnvelope>,
}

impl LifecycleHandle {
    /// Hand over a new window, or take the current one away
    pub fn set_window(&self, window: Option<WindowHandle>) -> Result<(), AppError> {
        let command = match window {
            Some(_) => AppCommand::InitWindow,
            None => AppCommand::TermWindow,
        };
        self.request(command, Payload::Window(window)).map(|_| ())
    }

    /// Attach or detach the input queue
    pub fn set_input_queue(&self, queue: Option<InputReceiver>) -> Result<(), AppError> {
        self.request(AppCommand::InputChanged, Payload::InputQueue(queue))
            .map(|_| ())
    }

    /// Ask the render thread for a snapshot to restore after process death
    pub fn save_instance_state(&self) -> Result<Vec<u8>, AppError> {
        match self.request(AppCommand::SaveState, Payload::None)? {
            Ack::SavedState(bytes) => Ok(bytes),
            Ack::Done => Err(AppError::UnexpectedAck("SaveState")),
        }
    }

    /// Stop the render thread; returns once the stroke in flight is discarded
    pub fn destroy(&self) -> Result<(), AppError> {
        self.request(AppCommand::Destroy, Payload::None).map(|_| ())
    }

    /// Send a command without waiting for it to be applied
    pub fn notify(&self, command: AppCommand) -> Result<(), AppError> {
        debug!("LifecycleHandle::notify {:?}", command);
        self.tx
            .send(CommandEnvelope {
                command,
                payload: Payload::None,
                ack: None,
            })
            .map_err(|_| AppError::RenderThreadGone)
    }

    /// Send a command and block until the render thread acknowledges it
    pub fn request(&self, command: AppCommand, payload: Payload) -> Result<Ack, AppError> {
        let (ack_tx, ack_rx) = bounded(1);
        self.tx
            .send(CommandEnvelope {
                command,
                payload,
                ack: Some(ack_tx),
            })
            .map_err(|_| AppError::RenderThreadGone)?;

        let ack = ack_rx.recv().map_err(|_| AppError::RenderThreadGone)?;
        debug!("LifecycleHandle: {:?} acknowledged", command);
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_request_blocks_until_ack() {
        let (handle, rx) = command_channel();
        let responder = thread::spawn(move || {
            let envelope = rx.recv().unwrap();
            assert_eq!(envelope.command, AppCommand::InitWindow);
            assert!(matches!(
                envelope.payload,
                Payload::Window(Some(WindowHandle { width: 64, height: 32 }))
            ));
            envelope.ack.unwrap().send(Ack::Done).unwrap();
        });

        handle.set_window(Some(WindowHandle::new(64, 32))).unwrap();
        responder.join().unwrap();
    }

    #[test]
    fn test_saved_state_is_returned() {
        let (handle, rx) = command_channel();
        let responder = thread::spawn(move || {
            let envelope = rx.recv().unwrap();
            envelope
                .ack
                .unwrap()
                .send(Ack::SavedState(vec![1, 2]))
                .unwrap();
        });

        assert_eq!(handle.save_instance_state().unwrap(), vec![1, 2]);
        responder.join().unwrap();
    }

    #[test]
    fn test_dropped_receiver_is_render_thread_gone() {
        let (handle, rx) = command_channel();
        drop(rx);
        assert!(matches!(handle.destroy(), Err(AppError::RenderThreadGone)));
        assert!(matches!(
            handle.notify(AppCommand::Pause),
            Err(AppError::RenderThreadGone)
        ));
    }

    #[test]
    fn test_dropped_ack_is_render_thread_gone() {
        let (handle, rx) = command_channel();
        let responder = thread::spawn(move || {
            // Render thread dies mid-command
            drop(rx.recv().unwrap());
        });

        assert!(matches!(
            handle.set_window(None),
            Err(AppError::RenderThreadGone)
        ));
        responder.join().unwrap();
    }

    #[test]
    fn test_notify_does_not_wait() {
        let (handle, rx) = command_channel();
        handle.notify(AppCommand::Resume).unwrap();
        let envelope = rx.try_recv().unwrap();
        assert_eq!(envelope.command, AppCommand::Resume);
        assert!(envelope.ack.is_none());
    }
}
