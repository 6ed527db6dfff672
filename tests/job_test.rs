//! Job runner integration tests
//!
//! Jobs run against a directory-backed store populated with generated
//! clips. Skipped when ffmpeg/ffprobe (or libx264) is not installed.

use clipforge::jobs::{run_normalize_job, run_playlist_job, JobContext};
use clipforge::payload::{encode_input_ids, parse_payload, NormalizeJob, PlaylistJob};
use clipforge::storage::{movies_bucket, preview_key, source_key, LocalStore, ObjectStore};
use clipforge_av::{check_tools, video_size, Dimensions, ToolCommand, Toolchain};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn toolchain() -> Option<Toolchain> {
    let toolchain = Toolchain::from_path().ok()?;
    check_tools(&toolchain)
        .iter()
        .all(|t| t.available)
        .then_some(toolchain)
}

fn make_clip(toolchain: &Toolchain, path: &Path, size: Dimensions) -> bool {
    let mut cmd = ToolCommand::new(toolchain.ffmpeg.clone());
    cmd.args(["-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=size={size}:rate=5:duration=1"))
        .args(["-f", "lavfi", "-i", "sine=frequency=440:duration=1"])
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac", "-shortest", "-f", "mp4"])
        .arg(path.to_string_lossy().to_string());
    cmd.execute().is_ok()
}

/// Generate a clip and upload it to `bucket/key`.
fn seed(tc: &Toolchain, store: &LocalStore, scratch: &Path, bucket: &str, key: &str, size: Dimensions) -> bool {
    let path: PathBuf = scratch.join(format!("{key}.mp4"));
    if !make_clip(tc, &path, size) {
        eprintln!("Skipping: cannot generate test clip");
        return false;
    }
    store.put(&path, bucket, key).unwrap();
    true
}

#[test]
fn test_normalize_job_publishes_both_tiers() {
    let Some(tc) = toolchain() else { return };
    let root = tempdir().unwrap();
    let scratch = tempdir().unwrap();
    let work = tempdir().unwrap();
    let store = LocalStore::new(root.path());
    let bucket = movies_bucket("test-");
    if !seed(&tc, &store, scratch.path(), &bucket, &source_key("42ab"), Dimensions::new(320, 240)) {
        return;
    }

    let job: NormalizeJob = parse_payload(
        r#"{"version": 1, "width": null, "height": 240, "fps": 5,
            "preview_file_id": "42ab", "bucket_prefix": "test-"}"#,
    )
    .unwrap();
    let ctx = JobContext::new(tc.clone(), store);
    let report = run_normalize_job(&ctx, &job, work.path()).unwrap();

    assert!(report.success, "{}", report.message);
    assert_eq!(report.outputs, vec!["previews-42ab", "lowdef-42ab"]);
    let high = root.path().join(&bucket).join("previews-42ab");
    let low = root.path().join(&bucket).join("lowdef-42ab");
    assert_eq!(video_size(&tc, &high).unwrap(), Dimensions::new(320, 240));
    assert_eq!(video_size(&tc, &low).unwrap(), Dimensions::new(1280, 960));
}

#[test]
fn test_playlist_job_full_reencodes_mixed_sizes() {
    let Some(tc) = toolchain() else { return };
    let root = tempdir().unwrap();
    let scratch = tempdir().unwrap();
    let work = tempdir().unwrap();
    let store = LocalStore::new(root.path());
    let bucket = movies_bucket("");
    if !seed(&tc, &store, scratch.path(), &bucket, &preview_key("a"), Dimensions::new(320, 240))
        || !seed(&tc, &store, scratch.path(), &bucket, &preview_key("b"), Dimensions::new(640, 480))
    {
        return;
    }

    let job = PlaylistJob {
        version: 1,
        width: Some(320),
        height: 240,
        fps: 5,
        input: encode_input_ids(&["a", "b"]).unwrap(),
        output_filename: "playlist.mp4".to_string(),
        output_key: "playlists-1".to_string(),
        full: true,
        bucket_prefix: String::new(),
    };
    let ctx = JobContext::new(tc.clone(), store);
    let report = run_playlist_job(&ctx, &job, work.path()).unwrap();

    assert!(report.success, "{}", report.message);
    assert_eq!(report.outputs, vec!["playlists-1"]);
    let published = root.path().join(&bucket).join("playlists-1");
    assert_eq!(video_size(&tc, &published).unwrap(), Dimensions::new(320, 240));

    // Inputs were staged under their cache names.
    assert!(work.path().join("cache-previews-a.mp4").exists());
    assert!(work.path().join("cache-previews-b.mp4").exists());
}
