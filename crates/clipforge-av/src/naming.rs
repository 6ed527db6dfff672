//! Deterministic file naming.
//!
//! Uploads are staged under a provisional name `<id><.ext>.tmp`. Every
//! intermediate file is a sibling named after its input, so concurrent
//! calls on different inputs never share a path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Marker appended to uploads that are still being processed.
pub const PROVISIONAL_SUFFIX: &str = "tmp";

/// Number of characters stripped from a provisional name (`.mov.tmp`) to
/// get back the bare identifier.
pub const TEMP_SUFFIX_LEN: usize = 8;

/// Media extension of a path, looking past a trailing provisional marker.
///
/// `clip.mov` and `clip.mov.tmp` both yield `mov`. A name without any dot
/// yields the whole name, like a plain split would.
pub fn media_extension(path: &Path) -> String {
    let name = file_name_lossy(path);
    let segments: Vec<&str> = name.split('.').collect();
    let last = segments.last().copied().unwrap_or_default();
    if last == PROVISIONAL_SUFFIX && segments.len() >= 2 {
        segments[segments.len() - 2].to_string()
    } else {
        last.to_string()
    }
}

/// Sibling path `<path><tag>.<ext>` used for intermediate results.
pub fn sibling_with_tag(path: &Path, tag: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(format!("{tag}.{}", media_extension(path)));
    PathBuf::from(name)
}

/// Paths of the high- and low-definition outputs for an input.
///
/// The input's file name loses its last [`TEMP_SUFFIX_LEN`] characters and
/// gets `.mp4` / `_low.mp4`. Names too short to carry the suffix fall back
/// to their file stem.
pub fn normalized_output_paths(input: &Path) -> (PathBuf, PathBuf) {
    let name = file_name_lossy(input);
    let chars: Vec<char> = name.chars().collect();
    let base: String = if chars.len() > TEMP_SUFFIX_LEN {
        chars[..chars.len() - TEMP_SUFFIX_LEN].iter().collect()
    } else {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    };

    let folder = input.parent().unwrap_or_else(|| Path::new(""));
    (
        folder.join(format!("{base}.mp4")),
        folder.join(format!("{base}_low.mp4")),
    )
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
