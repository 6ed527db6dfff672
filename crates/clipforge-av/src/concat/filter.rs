//! Re-encoding concatenation through a filter graph.

use super::ConcatParams;
use crate::command::{run_ffmpeg, BuildResult};
use crate::transcode::{AUDIO_CODEC, PIXEL_FORMAT, VIDEO_CODEC};
use crate::{Result, Toolchain};
use std::path::{Path, PathBuf};

/// Filter graph scaling each of `count` inputs to `width`x`height` with
/// square pixels and joining them into `[outv]` and `[outa]`.
pub fn filter_graph(count: usize, width: u32, height: u32) -> String {
    let mut graph = String::new();
    for i in 0..count {
        graph.push_str(&format!("[{i}:v]setsar=1/1,scale={width}:{height}[v{i}];"));
    }
    for i in 0..count {
        graph.push_str(&format!("[v{i}][{i}:a]"));
    }
    graph.push_str(&format!("concat=n={count}:v=1:a=1[outv][outa]"));
    graph
}

/// Full argument list of a filter concatenation.
pub fn filter_args(inputs: &[PathBuf], output: &Path, params: &ConcatParams) -> Vec<String> {
    let mut args = Vec::with_capacity(inputs.len() * 2 + 24);
    for input in inputs {
        args.push("-i".to_string());
        args.push(input.to_string_lossy().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        filter_graph(inputs.len(), params.width, params.height),
        "-map".into(),
        "[outv]".into(),
        "-map".into(),
        "[outa]".into(),
        "-c:v".into(),
        VIDEO_CODEC.into(),
        "-pix_fmt".into(),
        PIXEL_FORMAT.into(),
        "-r".into(),
        params.fps.to_string(),
        "-c:a".into(),
        AUDIO_CODEC.into(),
        "-movflags".into(),
        "+faststart".into(),
        output.to_string_lossy().to_string(),
    ]);
    args
}

/// Concatenate `inputs` with a full re-encode at the requested size.
///
/// Works on inputs of differing codecs and sizes, as long as each has at
/// least one video and one audio stream.
pub fn concat_filter(
    toolchain: &Toolchain,
    inputs: &[PathBuf],
    output: &Path,
    params: &ConcatParams,
) -> Result<BuildResult> {
    tracing::info!(
        "concat filter over {} inputs into {:?} at {}x{}",
        inputs.len(),
        output,
        params.width,
        params.height
    );
    Ok(run_ffmpeg(toolchain, &[], &filter_args(inputs, output, params)))
}
