//! Stream probing.
//!
//! Every call re-probes the file; nothing is cached between calls.

mod ffprobe;
mod types;

pub use ffprobe::probe_with_ffprobe;
pub use types::*;

use crate::geometry::Dimensions;
use crate::{Error, Result, Toolchain};
use std::path::Path;

/// Probe a media file and return its stream inventory.
pub fn probe_streams(toolchain: &Toolchain, path: &Path) -> Result<ProbeReport> {
    probe_with_ffprobe(toolchain, path)
}

/// Whether the file contains at least one audio stream.
pub fn has_audio(toolchain: &Toolchain, path: &Path) -> Result<bool> {
    Ok(probe_streams(toolchain, path)?.has_audio())
}

/// Size of the file's first video stream.
///
/// # Errors
///
/// [`Error::NoVideoStream`] when the container holds no video stream.
pub fn video_size(toolchain: &Toolchain, path: &Path) -> Result<Dimensions> {
    probe_streams(toolchain, path)?
        .video_size()
        .ok_or_else(|| Error::NoVideoStream {
            path: path.to_path_buf(),
        })
}
