//! Canvas save/restore across surface loss
//!
//! The canvas is written as a raw RGBA8 dump with no header. Dimensions are
//! remembered in memory by the store that wrote the file, and a restore
//! into a canvas of any other size is refused.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::surface::CpuSurface;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Canvas file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },
    #[error("Short read: expected {expected} bytes, file holds {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("Stored canvas is {stored_width}x{stored_height}, target is {width}x{height}")]
    DimensionMismatch {
        stored_width: u32,
        stored_height: u32,
        width: u32,
        height: u32,
    },
}

/// Raw RGBA8 canvas file
#[derive(Debug, Clone)]
pub struct CanvasStore {
    path: PathBuf,
    stored: Option<(u32, u32)>,
}

impl CanvasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stored: None,
        }
    }

    /// Whether `save` has succeeded since the store was created
    pub fn is_stored(&self) -> bool {
        self.stored.is_some()
    }

    /// Dimensions of the stored canvas
    pub fn stored_dimensions(&self) -> Option<(u32, u32)> {
        self.stored
    }

    /// Overwrite the file with the canvas pixels
    pub fn save(&mut self, surface: &CpuSurface) -> Result<(), PersistenceError> {
        let bytes = surface.as_bytes();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let written = write_fully(&mut file, bytes).map_err(|e| self.io_error(e))?;
        if written != bytes.len() {
            // A failed save leaves nothing worth restoring
            self.stored = None;
            return Err(PersistenceError::ShortWrite {
                expected: bytes.len(),
                written,
            });
        }
        file.flush().map_err(|e| self.io_error(e))?;

        self.stored = Some((surface.width, surface.height));
        info!(
            "Canvas saved: {}x{} to {}",
            surface.width,
            surface.height,
            self.path.display()
        );
        Ok(())
    }

    /// Restore the canvas, returning `Ok(false)` if nothing was saved
    pub fn load_into(&self, surface: &mut CpuSurface) -> Result<bool, PersistenceError> {
        let Some((stored_width, stored_height)) = self.stored else {
            debug!("CanvasStore::load_into: nothing stored");
            return Ok(false);
        };
        if (stored_width, stored_height) != (surface.width, surface.height) {
            return Err(PersistenceError::DimensionMismatch {
                stored_width,
                stored_height,
                width: surface.width,
                height: surface.height,
            });
        }

        let expected = surface.byte_len();
        let mut bytes = Vec::with_capacity(expected);
        File::open(&self.path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(|e| self.io_error(e))?;
        if bytes.len() != expected {
            return Err(PersistenceError::ShortRead {
                expected,
                actual: bytes.len(),
            });
        }

        surface
            .copy_from_bytes(&bytes)
            .map_err(|e| PersistenceError::ShortRead {
                expected: e.expected,
                actual: e.actual,
            })?;
        info!(
            "Canvas restored: {}x{} from {}",
            surface.width,
            surface.height,
            self.path.display()
        );
        Ok(true)
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Write as much of `bytes` as the writer accepts, returning the count
fn write_fully(writer: &mut impl Write, mut bytes: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while !bytes.is_empty() {
        match writer.write(bytes) {
            Ok(0) => break,
            Ok(n) => {
                written += n;
                bytes = &bytes[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}
