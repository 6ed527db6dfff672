//! Playlist movie assembly.

use crate::command::BuildResult;
use crate::concat::{ConcatParams, ConcatStrategy};
use crate::probe::{has_audio, video_size};
use crate::soundtrack::{add_empty_soundtrack, SoundtrackOptions};
use crate::{Result, Toolchain};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One clip of a playlist, in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub path: PathBuf,
    /// Display label, carried for callers and logs only.
    #[serde(default)]
    pub label: Option<String>,
}

impl PlaylistItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Concatenate `items` into `output` with one strategy.
///
/// When `width` is unset, the output takes the first item's video size and
/// `height` is ignored. Items without audio get a silent soundtrack first,
/// rewriting them in place; the first injection failure aborts the build. No fallback between
/// strategies happens here.
///
/// An empty playlist is a failed result with an empty message.
///
/// # Errors
///
/// Probing failures (a vanished input, a file with no video stream) and
/// environment failures. Encoder failures are reported in the result.
pub fn build_playlist_movie(
    toolchain: &Toolchain,
    strategy: ConcatStrategy,
    items: &[PlaylistItem],
    output: &Path,
    width: Option<u32>,
    height: u32,
    fps: u32,
) -> Result<BuildResult> {
    let Some(first) = items.first() else {
        return Ok(BuildResult::failed(""));
    };

    let (width, height) = match width {
        Some(width) => (width, height),
        None => {
            let size = video_size(toolchain, &first.path)?;
            (size.width, size.height)
        }
    };

    let mut result = BuildResult::ok();
    for item in items {
        if has_audio(toolchain, &item.path)? {
            continue;
        }
        tracing::info!("adding silent soundtrack to {:?}", item.path);
        let outcome = add_empty_soundtrack(toolchain, &item.path, SoundtrackOptions::default())?;
        if let Some(diagnostic) = &outcome.diagnostic {
            result.push_message(diagnostic);
        }
        if !outcome.is_success() {
            tracing::error!(
                "soundtrack injection failed for {:?} (exit code {})",
                item.path,
                outcome.exit_code
            );
            result.success = false;
            return Ok(result);
        }
    }

    let inputs: Vec<PathBuf> = items.iter().map(|item| item.path.clone()).collect();
    let params = ConcatParams { width, height, fps };
    tracing::info!(
        "building playlist of {} clips with {strategy} at {width}x{height}, {fps} fps",
        inputs.len()
    );
    let run = strategy.concat(toolchain, &inputs, output, &params)?;
    result.push_message(&run.message);
    result.success = run.success;
    Ok(result)
}
