//! Strategy selection on top of the core builders.

use anyhow::Result;
use clipforge_av::{
    build_playlist_movie, normalize, BuildResult, ConcatStrategy, EncodingParameters,
    NormalizationResult, PlaylistItem, Toolchain,
};
use serde::Serialize;
use std::path::Path;

/// Result of [`build_playlist_with_fallback`], with the strategy that
/// produced it.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistOutcome {
    pub strategy: ConcatStrategy,
    pub result: BuildResult,
}

/// Build a playlist movie, trying the stream-copy demuxer first and the
/// re-encoding filter second.
///
/// The demuxer attempt only counts when it reports success *and* the output
/// file exists; an error, a failed result or a missing file all fall back.
/// With `full` set the demuxer is skipped.
pub fn build_playlist_with_fallback(
    toolchain: &Toolchain,
    items: &[PlaylistItem],
    output: &Path,
    width: Option<u32>,
    height: u32,
    fps: u32,
    full: bool,
) -> Result<PlaylistOutcome> {
    if !full {
        let strategy = ConcatStrategy::Demuxer;
        tracing::info!("building playlist with {strategy}");
        match build_playlist_movie(toolchain, strategy, items, output, width, height, fps) {
            Ok(result) if result.success && output.exists() => {
                return Ok(PlaylistOutcome { strategy, result });
            }
            Ok(result) if result.success => {
                tracing::warn!("{strategy} reported success but {:?} is missing", output);
            }
            Ok(result) => {
                tracing::warn!("{strategy} failed: {}", result.message.trim());
            }
            Err(e) => {
                tracing::warn!("{strategy} failed: {e}");
            }
        }
    }

    let strategy = ConcatStrategy::Filter;
    tracing::info!("building playlist with {strategy}");
    let result = build_playlist_movie(toolchain, strategy, items, output, width, height, fps)?;
    if !result.success {
        tracing::warn!("{strategy} failed: {}", result.message.trim());
    }
    Ok(PlaylistOutcome { strategy, result })
}

/// Normalized preview with its outcome in the shared result vocabulary.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutcome {
    pub files: NormalizationResult,
    pub result: BuildResult,
}

/// Normalize a preview, turning an embedded error into a failed result.
pub fn normalize_preview(
    toolchain: &Toolchain,
    path: &Path,
    params: &EncodingParameters,
) -> Result<PreviewOutcome> {
    let files = normalize(toolchain, path, params)?;
    let result = match &files.error {
        None => BuildResult::ok(),
        Some(e) => {
            tracing::error!("Normalization failed: {e}");
            BuildResult::failed(e.clone())
        }
    };
    Ok(PreviewOutcome { files, result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_playlist_falls_back_and_fails() {
        let toolchain = Toolchain::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let dir = tempfile::tempdir().unwrap();
        let outcome = build_playlist_with_fallback(
            &toolchain,
            &[],
            &dir.path().join("playlist.mp4"),
            None,
            720,
            24,
            false,
        )
        .unwrap();
        assert_eq!(outcome.strategy, ConcatStrategy::Filter);
        assert!(!outcome.result.success);
    }

    #[test]
    fn demuxer_error_falls_back_to_filter() {
        let toolchain = Toolchain::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let dir = tempfile::tempdir().unwrap();
        let items = [PlaylistItem::new(dir.path().join("missing.mp4"))];

        // The demuxer attempt errors out on the missing file and is
        // swallowed; the filter attempt surfaces the same error.
        let result = build_playlist_with_fallback(
            &toolchain,
            &items,
            &dir.path().join("playlist.mp4"),
            Some(640),
            360,
            24,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn normalize_missing_file_is_an_error() {
        let toolchain = Toolchain::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let params = EncodingParameters {
            width: None,
            height: 720,
            fps: 24,
        };
        assert!(normalize_preview(&toolchain, Path::new("/nonexistent/a.mp4"), &params).is_err());
    }
}
