//! Activity lifecycle state machine
//!
//! Every command the UI thread can send is resolved against one table keyed
//! by (current state, command). A row lists the side effects the render
//! thread performs, in order, and the state it ends in.

use AppCommand as C;
use Effect as E;
use LifecycleState::{Attached, Detached};

/// Commands delivered from the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCommand {
    InputChanged,
    InitWindow,
    TermWindow,
    WindowResized,
    WindowRedrawNeeded,
    ContentRectChanged,
    GainedFocus,
    LostFocus,
    ConfigChanged,
    LowMemory,
    Start,
    Resume,
    SaveState,
    Pause,
    Stop,
    Destroy,
}

/// Render-thread lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Running without a window; the canvas lives only in the dump file
    #[default]
    Detached,
    /// Window and renderer present
    Attached,
    /// Terminal
    Destroyed,
}

/// Side effects applied by the render thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SwapInputQueue,
    AttachWindow,
    InitRenderer,
    RestoreCanvas,
    SaveCanvas,
    ReleaseRenderer,
    DetachWindow,
    ReloadConfig,
    FreeSavedState,
    DiscardStroke,
    StopRunning,
    /// Release the UI thread waiting on this command
    Acknowledge,
}

/// Result of looking up one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub effects: &'static [Effect],
    pub next: LifecycleState,
}

struct Row {
    state: LifecycleState,
    command: AppCommand,
    effects: &'static [Effect],
    next: LifecycleState,
}

const fn row(
    state: LifecycleState,
    command: AppCommand,
    effects: &'static [Effect],
    next: LifecycleState,
) -> Row {
    Row {
        state,
        command,
        effects,
        next,
    }
}

static TRANSITIONS: &[Row] = &[
    row(
        Detached,
        C::InitWindow,
        &[E::AttachWindow, E::InitRenderer, E::RestoreCanvas, E::Acknowledge],
        Attached,
    ),
    row(Attached, C::InitWindow, &[E::AttachWindow, E::Acknowledge], Attached),
    row(
        Attached,
        C::TermWindow,
        &[E::SaveCanvas, E::ReleaseRenderer, E::DetachWindow, E::Acknowledge],
        Detached,
    ),
    row(Detached, C::TermWindow, &[E::DetachWindow, E::Acknowledge], Detached),
    row(Detached, C::InputChanged, &[E::SwapInputQueue, E::Acknowledge], Detached),
    row(Attached, C::InputChanged, &[E::SwapInputQueue, E::Acknowledge], Attached),
    row(Detached, C::ConfigChanged, &[E::ReloadConfig], Detached),
    row(Attached, C::ConfigChanged, &[E::ReloadConfig], Attached),
    row(Detached, C::SaveState, &[E::FreeSavedState, E::Acknowledge], Detached),
    row(Attached, C::SaveState, &[E::FreeSavedState, E::Acknowledge], Attached),
    row(Detached, C::Resume, &[E::FreeSavedState], Detached),
    row(Attached, C::Resume, &[E::FreeSavedState], Attached),
    row(
        Detached,
        C::Destroy,
        &[E::DiscardStroke, E::StopRunning, E::Acknowledge],
        LifecycleState::Destroyed,
    ),
    row(
        Attached,
        C::Destroy,
        &[E::DiscardStroke, E::StopRunning, E::Acknowledge],
        LifecycleState::Destroyed,
    ),
];

/// Look up the transition for `command` in `state`
///
/// Commands without a row change nothing.
pub fn transition(state: LifecycleState, command: AppCommand) -> Transition {
    TRANSITIONS
        .iter()
        .find(|row| row.state == state && row.command == command)
        .map(|row| Transition {
            effects: row.effects,
            next: row.next,
        })
        .unwrap_or(Transition {
            effects: &[],
            next: state,
        })
}
