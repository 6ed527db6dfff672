//! FFprobe-based stream inventory.

use super::types::*;
use crate::command::ToolCommand;
use crate::{Error, Result, Toolchain};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    #[serde(default)]
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a media file's streams using ffprobe.
///
/// # Errors
///
/// [`Error::Probe`] if the file does not exist, ffprobe rejects it or its
/// JSON cannot be parsed; [`Error::ToolNotFound`] if ffprobe is missing.
pub fn probe_with_ffprobe(toolchain: &Toolchain, path: &Path) -> Result<ProbeReport> {
    if !path.exists() {
        return Err(Error::probe(path, "file does not exist"));
    }

    let mut cmd = ToolCommand::new(toolchain.ffprobe.clone());
    cmd.args(["-v", "error", "-print_format", "json", "-show_streams"]);
    cmd.arg(path.to_string_lossy());

    tracing::debug!("{}", cmd.command_line());

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(Error::probe(path, output.stderr.trim()));
    }

    parse_ffprobe_json(path, &output.stdout)
}

pub(crate) fn parse_ffprobe_json(path: &Path, json: &str) -> Result<ProbeReport> {
    let ff_output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| Error::probe(path, format!("invalid ffprobe output: {e}")))?;

    let streams = ff_output
        .streams
        .into_iter()
        .map(|s| StreamInfo {
            index: s.index,
            kind: StreamKind::from_codec_type(s.codec_type.as_deref().unwrap_or("")),
            codec_name: s.codec_name,
            width: s.width,
            height: s.height,
        })
        .collect();

    Ok(ProbeReport {
        path: path.to_path_buf(),
        streams,
    })
}
