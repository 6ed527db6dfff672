//! Normalization of an uploaded clip into the high- and low-definition tiers.

use crate::command::run_ffmpeg;
use crate::geometry::{low_def_size, target_size, Dimensions};
use crate::naming::normalized_output_paths;
use crate::probe::{has_audio, video_size};
use crate::soundtrack::{add_empty_soundtrack, SoundtrackOptions};
use crate::{Error, Result, Toolchain};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Video encoder used for every re-encode.
pub const VIDEO_CODEC: &str = "libx264";
/// The single audio codec of the pipeline.
pub const AUDIO_CODEC: &str = "aac";
/// Planar 4:2:0.
pub const PIXEL_FORMAT: &str = "yuv420p";
pub const PRESET: &str = "slow";
/// Color primaries, transfer and matrix are all tagged with this standard,
/// whatever the source says.
pub const COLOR_STANDARD: &str = "bt709";

/// Requested output geometry and frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingParameters {
    /// Unset means "derive from height and the source aspect ratio".
    pub width: Option<u32>,
    pub height: u32,
    pub fps: u32,
}

/// Output of [`normalize`].
///
/// The caller owns both files. When `error` is set they may be missing or
/// incomplete and must not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub high_def_path: PathBuf,
    pub low_def_path: PathBuf,
    pub error: Option<String>,
}

impl NormalizationResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Encoder settings of one output tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeProfile {
    /// Step name used in logs and error messages.
    pub name: &'static str,
    /// Target video bitrate, encoder default when unset.
    pub video_bitrate: Option<&'static str>,
}

impl EncodeProfile {
    pub const fn high() -> Self {
        Self {
            name: "Compute high def version",
            video_bitrate: Some("28M"),
        }
    }

    pub const fn low() -> Self {
        Self {
            name: "Compute low def version",
            video_bitrate: Some("1M"),
        }
    }

    /// Video-only re-encode used to repair clips that refuse a stream-copy.
    pub(crate) const fn video_only() -> Self {
        Self {
            name: "Re-encode video",
            video_bitrate: None,
        }
    }

    /// Video codec, rate control, pixel format, size and color tags.
    pub fn video_args(&self, size: Dimensions) -> Vec<String> {
        let mut args: Vec<String> = vec!["-c:v".into(), VIDEO_CODEC.into(), "-preset".into(), PRESET.into()];
        if let Some(bitrate) = self.video_bitrate {
            args.push("-b:v".into());
            args.push(bitrate.into());
        }
        args.extend([
            "-pix_fmt".to_string(),
            PIXEL_FORMAT.into(),
            "-s".into(),
            size.to_ffmpeg_size(),
            "-color_primaries".into(),
            COLOR_STANDARD.into(),
            "-color_trc".into(),
            COLOR_STANDARD.into(),
            "-colorspace".into(),
            COLOR_STANDARD.into(),
        ]);
        args
    }

    /// MP4 with the index moved to the front for progressive playback.
    pub fn container_args() -> Vec<String> {
        vec![
            "-f".into(),
            "mp4".into(),
            "-movflags".into(),
            "+faststart".into(),
        ]
    }
}

/// Full argument list of a tier encode (without the overwrite flag).
pub fn normalize_encoding_args(
    source: &Path,
    output: &Path,
    profile: &EncodeProfile,
    size: Dimensions,
    fps: u32,
) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        source.to_string_lossy().to_string(),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "0:a:0".into(),
    ];
    args.extend(profile.video_args(size));
    args.extend(["-r".to_string(), fps.to_string(), "-c:a".into(), AUDIO_CODEC.into()]);
    args.extend(EncodeProfile::container_args());
    args.push(output.to_string_lossy().to_string());
    args
}

/// Normalize a clip into a high-definition and a low-definition MP4.
///
/// Steps: probe the source size, compute the high-def size, add a silent
/// soundtrack if the source has none, encode high-def, then low-def at
/// [`crate::geometry::LOW_DEF_WIDTH`]. Output names are derived from the
/// input path, so repeated calls write to the same files.
///
/// # Errors
///
/// Only probing failures (and environment failures such as a missing
/// encoder) are returned as `Err`. Injection and encode failures are
/// reported in [`NormalizationResult::error`], alongside the planned paths.
pub fn normalize(
    toolchain: &Toolchain,
    path: &Path,
    params: &EncodingParameters,
) -> Result<NormalizationResult> {
    let (high_def_path, low_def_path) = normalized_output_paths(path);
    let mut result = NormalizationResult {
        high_def_path,
        low_def_path,
        error: None,
    };

    let source = video_size(toolchain, path)?;
    let high = target_size(source, params.width, params.height)?;
    tracing::info!("normalize {:?}: source {source}, high def {high}, fps {}", path, params.fps);

    if !has_audio(toolchain, path)? {
        let outcome = add_empty_soundtrack(toolchain, path, SoundtrackOptions::default())?;
        if !outcome.is_success() {
            let err = Error::SoundtrackInjection {
                path: path.to_path_buf(),
                code: outcome.exit_code,
                message: outcome.diagnostic.unwrap_or_default(),
            };
            tracing::error!("normalize {:?} aborted: {err}", path);
            result.error = Some(err.to_string());
            return Ok(result);
        }
    }

    if let Err(e) = encode_tier(toolchain, path, &result.high_def_path, &EncodeProfile::high(), high, params.fps) {
        result.error = Some(e.to_string());
        return Ok(result);
    }

    let low = low_def_size(high)?;
    if let Err(e) = encode_tier(toolchain, path, &result.low_def_path, &EncodeProfile::low(), low, params.fps) {
        result.error = Some(e.to_string());
    }

    Ok(result)
}

fn encode_tier(
    toolchain: &Toolchain,
    source: &Path,
    output: &Path,
    profile: &EncodeProfile,
    size: Dimensions,
    fps: u32,
) -> Result<()> {
    tracing::info!("{}: {size} -> {:?}", profile.name, output);
    let args = normalize_encoding_args(source, output, profile, size, fps);
    let run = run_ffmpeg(toolchain, &[], &args);
    if run.success {
        Ok(())
    } else {
        Err(Error::encode(profile.name, run.message))
    }
}
