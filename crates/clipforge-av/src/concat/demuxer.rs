//! Stream-copy concatenation through the concat demuxer.

use super::ConcatParams;
use crate::command::{run_ffmpeg, BuildResult};
use crate::probe::{probe_streams, ProbeReport, StreamKind};
use crate::{Error, Result, Toolchain};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Check the stream layout the demuxer path relies on: exactly one video
/// stream at index 0 followed by one audio stream.
///
/// Codec parameters are not compared. Inputs that pass here can still be
/// rejected by the encoder.
pub fn check_stream_layout(report: &ProbeReport) -> Result<()> {
    let path = &report.path;
    let count = report.streams.len();
    if count != 2 {
        return Err(Error::layout_mismatch(
            path,
            format!("{} has an unexpected stream number ({count})", path.display()),
        ));
    }

    let kinds = report.kinds();
    if !(kinds.contains(&StreamKind::Video) && kinds.contains(&StreamKind::Audio)) {
        let types: Vec<String> = kinds.iter().map(ToString::to_string).collect();
        return Err(Error::layout_mismatch(
            path,
            format!("{} has unexpected stream type ({})", path.display(), types.join(", ")),
        ));
    }

    if kinds[0] != StreamKind::Video {
        return Err(Error::layout_mismatch(
            path,
            format!("{} has an unexpected stream order", path.display()),
        ));
    }
    Ok(())
}

/// Contents of a concat list, one `file '<path>'` line per input.
pub fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|input| {
            // Relative entries would resolve against the list's directory.
            let absolute = input.canonicalize().unwrap_or_else(|_| input.clone());
            let quoted = absolute.to_string_lossy().replace('\'', r"'\''");
            format!("file '{quoted}'\n")
        })
        .collect()
}

/// Arguments reading `list` through the concat demuxer and stream-copying
/// the result into `output`.
pub fn demuxer_args(list: &Path, output: &Path) -> Vec<String> {
    vec![
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list.to_string_lossy().to_string(),
        "-map".into(),
        "0:v".into(),
        "-map".into(),
        "0:a".into(),
        "-c".into(),
        "copy".into(),
        output.to_string_lossy().to_string(),
    ]
}

/// Concatenate `inputs` without re-encoding.
///
/// Size and frame rate are not applied; the inputs are expected to share
/// them already.
pub fn concat_demuxer(
    toolchain: &Toolchain,
    inputs: &[PathBuf],
    output: &Path,
    _params: &ConcatParams,
) -> Result<BuildResult> {
    for input in inputs {
        let report = probe_streams(toolchain, input)?;
        if let Err(e) = check_stream_layout(&report) {
            tracing::warn!("concat demuxer rejected input: {e}");
            return Ok(BuildResult::from(e));
        }
    }

    let mut list = tempfile::Builder::new()
        .prefix("clipforge-concat-")
        .suffix(".txt")
        .tempfile()?;
    list.write_all(concat_list(inputs).as_bytes())?;
    list.flush()?;

    tracing::info!("concat demuxer over {} inputs into {:?}", inputs.len(), output);
    Ok(run_ffmpeg(toolchain, &["-xerror"], &demuxer_args(list.path(), output)))
}
