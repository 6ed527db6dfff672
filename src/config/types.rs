use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub playlist: PlaylistConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub workdir: WorkdirConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

/// Defaults for `normalize` and `playlist` when the command line or the
/// job payload leaves them out.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NormalizeConfig {
    /// Output frame rate (default: 24)
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// High-def output height (default: 1080)
    #[serde(default = "default_height")]
    pub height: u32,

    /// High-def output width, derived from the source aspect ratio when unset
    #[serde(default)]
    pub width: Option<u32>,
}

fn default_fps() -> u32 {
    24
}

fn default_height() -> u32 {
    1080
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            height: default_height(),
            width: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaylistConfig {
    /// Always re-encode, skipping the stream-copy attempt
    #[serde(default)]
    pub full: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the local object store
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Prefix prepended to every bucket name
    #[serde(default)]
    pub bucket_prefix: String,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./storage")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            bucket_prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkdirConfig {
    /// Directory where jobs stage their files. A fresh temp directory per
    /// job when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
