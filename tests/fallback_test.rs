//! Strategy fallback tests
//!
//! ffmpeg and ffprobe are shell scripts here, so the demuxer can be made to
//! fail or to "succeed" without writing anything. The ffprobe script prints
//! `<clip>.streams.json`; the ffmpeg script logs its arguments first.

#![cfg(unix)]

use clipforge::build::{build_playlist_with_fallback, normalize_preview};
use clipforge_av::{ConcatStrategy, EncodingParameters, PlaylistItem, Toolchain};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const VIDEO_AUDIO: &str = r#"{"streams": [
    {"index": 0, "codec_type": "video", "codec_name": "h264", "width": 320, "height": 240},
    {"index": 1, "codec_type": "audio", "codec_name": "aac"}
]}"#;

const VIDEO_ONLY: &str = r#"{"streams": [
    {"index": 0, "codec_type": "video", "codec_name": "h264", "width": 320, "height": 240}
]}"#;

struct StubTools {
    toolchain: Toolchain,
    log: PathBuf,
}

fn install_tools(dir: &Path, ffmpeg_body: &str) -> StubTools {
    let log = dir.join("ffmpeg.log");
    let ffprobe = dir.join("ffprobe");
    let ffmpeg = dir.join("ffmpeg");
    write_script(&ffprobe, "for last; do :; done\ncat \"$last.streams.json\"");
    write_script(
        &ffmpeg,
        &format!(
            "echo \"$@\" >> '{}'\nfor last; do :; done\n{ffmpeg_body}",
            log.display()
        ),
    );
    StubTools {
        toolchain: Toolchain::new(ffmpeg, ffprobe),
        log,
    }
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn runs(tools: &StubTools) -> Vec<String> {
    fs::read_to_string(&tools.log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn clips(dir: &Path, streams: &str) -> Vec<PlaylistItem> {
    ["a.mp4", "b.mp4"]
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, "orig").unwrap();
            fs::write(dir.join(format!("{name}.streams.json")), streams).unwrap();
            PlaylistItem::new(path)
        })
        .collect()
}

#[test]
fn test_demuxer_output_is_kept() {
    let tools_dir = tempdir().unwrap();
    let work = tempdir().unwrap();
    let tools = install_tools(tools_dir.path(), ": > \"$last\"");
    let items = clips(work.path(), VIDEO_AUDIO);
    let output = work.path().join("playlist.mp4");

    let outcome =
        build_playlist_with_fallback(&tools.toolchain, &items, &output, Some(320), 240, 5, false)
            .unwrap();

    assert_eq!(outcome.strategy, ConcatStrategy::Demuxer);
    assert!(outcome.result.success);
    assert_eq!(runs(&tools).len(), 1);
}

#[test]
fn test_demuxer_success_without_output_falls_back() {
    let tools_dir = tempdir().unwrap();
    let work = tempdir().unwrap();
    let tools = install_tools(
        tools_dir.path(),
        "case \"$*\" in *\"-f concat\"*) exit 0 ;; esac\n: > \"$last\"",
    );
    let items = clips(work.path(), VIDEO_AUDIO);
    let output = work.path().join("playlist.mp4");

    let outcome =
        build_playlist_with_fallback(&tools.toolchain, &items, &output, Some(320), 240, 5, false)
            .unwrap();

    assert_eq!(outcome.strategy, ConcatStrategy::Filter);
    assert!(outcome.result.success, "{}", outcome.result.message);
    assert!(output.exists());
    let runs = runs(&tools);
    assert_eq!(runs.len(), 2);
    assert!(runs[0].contains("-f concat"));
    assert!(runs[1].contains("-filter_complex"));
}

#[test]
fn test_demuxer_encoder_failure_falls_back() {
    let tools_dir = tempdir().unwrap();
    let work = tempdir().unwrap();
    let tools = install_tools(
        tools_dir.path(),
        "case \"$*\" in *\"-f concat\"*) echo 'non-monotonic DTS' >&2; exit 1 ;; esac\n: > \"$last\"",
    );
    let items = clips(work.path(), VIDEO_AUDIO);
    let output = work.path().join("playlist.mp4");

    let outcome =
        build_playlist_with_fallback(&tools.toolchain, &items, &output, Some(320), 240, 5, false)
            .unwrap();

    assert_eq!(outcome.strategy, ConcatStrategy::Filter);
    assert!(outcome.result.success, "{}", outcome.result.message);
    assert_eq!(runs(&tools).len(), 2);
}

#[test]
fn test_full_skips_demuxer() {
    let tools_dir = tempdir().unwrap();
    let work = tempdir().unwrap();
    let tools = install_tools(tools_dir.path(), ": > \"$last\"");
    let items = clips(work.path(), VIDEO_AUDIO);

    let outcome = build_playlist_with_fallback(
        &tools.toolchain,
        &items,
        &work.path().join("playlist.mp4"),
        Some(320),
        240,
        5,
        true,
    )
    .unwrap();

    assert_eq!(outcome.strategy, ConcatStrategy::Filter);
    let runs = runs(&tools);
    assert_eq!(runs.len(), 1);
    assert!(!runs[0].contains("-f concat"));
}

#[test]
fn test_normalize_preview_reports_injection_failure() {
    let tools_dir = tempdir().unwrap();
    let work = tempdir().unwrap();
    let tools = install_tools(tools_dir.path(), "echo boom >&2\nexit 1");
    let source = work.path().join("42ab.mov.tmp");
    fs::write(&source, "orig").unwrap();
    fs::write(work.path().join("42ab.mov.tmp.streams.json"), VIDEO_ONLY).unwrap();
    let params = EncodingParameters {
        width: None,
        height: 240,
        fps: 5,
    };

    let outcome = normalize_preview(&tools.toolchain, &source, &params).unwrap();

    assert!(!outcome.result.success);
    assert!(outcome.result.message.contains("boom"));
    assert_eq!(outcome.files.error.as_deref(), Some(outcome.result.message.as_str()));
    assert_eq!(fs::read_to_string(&source).unwrap(), "orig");
}
