//! Host error type

use doodle_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Render thread is gone")]
    RenderThreadGone,
    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Render thread panicked")]
    RenderThreadPanicked,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unexpected acknowledgement for {0}")]
    UnexpectedAck(&'static str),
}
