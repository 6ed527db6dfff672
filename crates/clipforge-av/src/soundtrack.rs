//! Silent soundtrack injection.
//!
//! Concatenation and the normalized MP4 layout both expect one audio stream
//! per clip. Clips without one get a generated silent track muxed next to
//! their untouched video stream.

use crate::command::{ToolCommand, ToolOutput};
use crate::geometry::Dimensions;
use crate::probe::{has_audio, video_size};
use crate::transcode::{EncodeProfile, AUDIO_CODEC};
use crate::{Result, Toolchain, Workspace};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for [`add_empty_soundtrack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundtrackOptions {
    /// When the stream-copy mux fails, re-encode the video once and retry.
    pub repair: bool,
}

impl Default for SoundtrackOptions {
    fn default() -> Self {
        Self { repair: true }
    }
}

/// Result of a soundtrack injection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundtrackOutcome {
    /// Exit code of the last encoder run, `0` when nothing had to be done.
    pub exit_code: i32,
    /// Captured standard output of the last encoder run.
    pub stdout: String,
    /// Encoder diagnostics of every attempt. Present on success too.
    pub diagnostic: Option<String>,
}

impl SoundtrackOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    fn append(&mut self, output: &ToolOutput) {
        self.exit_code = output.exit_code();
        self.stdout = output.stdout.clone();
        self.append_text(&output.stderr);
    }

    fn append_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut self.diagnostic {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => self.diagnostic = Some(text.to_string()),
        }
    }
}

/// Make sure `path` has an audio stream, adding a silent one if needed.
pub fn ensure_soundtrack(toolchain: &Toolchain, path: &Path) -> Result<SoundtrackOutcome> {
    if has_audio(toolchain, path)? {
        return Ok(SoundtrackOutcome::default());
    }
    add_empty_soundtrack(toolchain, path, SoundtrackOptions::default())
}

/// Mux a generated silent track with the video stream of `path` and replace
/// the file's contents with the result.
///
/// The video is stream-copied and the output is cut to the shorter stream,
/// so the video duration governs. On a nonzero exit the original file is
/// left untouched and the exit code and diagnostics are returned.
///
/// # Errors
///
/// Only environment failures are errors (missing ffmpeg, I/O while
/// replacing the file); encoder failures are reported in the outcome.
pub fn add_empty_soundtrack(
    toolchain: &Toolchain,
    path: &Path,
    options: SoundtrackOptions,
) -> Result<SoundtrackOutcome> {
    let mut workspace = Workspace::new(path)?;
    let muxed = workspace.intermediate("_empty_audio")?;
    let mut outcome = SoundtrackOutcome::default();

    let first = run_tool(toolchain, &silence_mux_args(path, &muxed))?;
    outcome.append(&first);
    tracing::info!("add_empty_soundtrack exit code: {}", outcome.exit_code);

    if outcome.is_success() {
        workspace.finalize(&muxed)?;
        return Ok(outcome);
    }

    tracing::error!(
        "silent soundtrack mux failed for {:?} (exit code {}): {}",
        path,
        outcome.exit_code,
        first.stderr.trim()
    );
    if !options.repair {
        return Ok(outcome);
    }

    // Re-encode the video alone, then mux the silence onto that copy.
    let size = match video_size(toolchain, path) {
        Ok(size) => size.to_even(),
        Err(e) => {
            outcome.append_text(&format!("repair skipped: {e}"));
            return Ok(outcome);
        }
    };
    let reencoded = workspace.intermediate("_reencoded")?;
    let repair = run_tool(toolchain, &reencode_video_args(path, &reencoded, size))?;
    outcome.append(&repair);
    if !outcome.is_success() {
        tracing::error!("video re-encode before soundtrack retry failed for {:?}", path);
        return Ok(outcome);
    }

    let retry = run_tool(toolchain, &silence_mux_args(&reencoded, &muxed))?;
    outcome.append(&retry);
    if outcome.is_success() {
        workspace.finalize(&muxed)?;
        tracing::info!("silent soundtrack added to {:?} after re-encode", path);
    } else {
        tracing::error!("silent soundtrack retry failed for {:?}", path);
    }
    Ok(outcome)
}

/// Arguments muxing `anullsrc` silence with the video of `video_source`.
pub fn silence_mux_args(video_source: &Path, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".into(),
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        "anullsrc".into(),
        "-i".into(),
        video_source.to_string_lossy().to_string(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        AUDIO_CODEC.into(),
        "-map".into(),
        "0:a".into(),
        "-map".into(),
        "1:v".into(),
        "-shortest".into(),
        output.to_string_lossy().to_string(),
    ]
}

/// Arguments re-encoding the first video stream of `source` alone.
pub fn reencode_video_args(source: &Path, output: &Path, size: Dimensions) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        source.to_string_lossy().to_string(),
        "-map".into(),
        "0:v:0".into(),
    ];
    args.extend(EncodeProfile::video_only().video_args(size));
    args.extend(EncodeProfile::container_args());
    args.push(output.to_string_lossy().to_string());
    args
}

fn run_tool(toolchain: &Toolchain, args: &[String]) -> Result<ToolOutput> {
    let mut cmd = ToolCommand::new(toolchain.ffmpeg.clone());
    cmd.arg("-y");
    cmd.args(args.iter().cloned());
    tracing::info!("Launch ffmpeg with args: {}", cmd.command_line());
    cmd.output()
}
