//! External tool detection and management.
//!
//! The [`Toolchain`] resolves the encoder (`ffmpeg`) and the prober
//! (`ffprobe`) once, and is then passed explicitly to every operation in the
//! crate.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Resolved paths of the external tools the pipeline shells out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    /// Path to the ffmpeg executable.
    pub ffmpeg: PathBuf,
    /// Path to the ffprobe executable.
    pub ffprobe: PathBuf,
}

impl Toolchain {
    /// Build a toolchain from explicit paths without checking them.
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Resolve both tools, preferring configured paths over a `PATH` lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] if either tool cannot be located.
    pub fn discover(ffmpeg_path: Option<&Path>, ffprobe_path: Option<&Path>) -> Result<Self> {
        Ok(Self {
            ffmpeg: get_tool_path("ffmpeg", ffmpeg_path)?,
            ffprobe: get_tool_path("ffprobe", ffprobe_path)?,
        })
    }

    /// Resolve both tools from `PATH`.
    pub fn from_path() -> Result<Self> {
        Self::discover(None, None)
    }
}

impl Default for Toolchain {
    /// Bare tool names, resolved by the OS at spawn time.
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

/// Check if a tool is available and get its information.
///
/// ffmpeg and ffprobe only understand the single-dash `-version` flag.
///
/// # Example
///
/// ```no_run
/// use clipforge_av::check_tool;
///
/// let info = check_tool("ffprobe");
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_at(name, Path::new(name))
}

/// Check a tool at an explicit location.
pub fn check_tool_at(name: &str, program: &Path) -> ToolInfo {
    let result = Command::new(program).arg("-version").output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = which::which(program).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check the tools of a toolchain.
pub fn check_tools(toolchain: &Toolchain) -> Vec<ToolInfo> {
    vec![
        check_tool_at("ffmpeg", &toolchain.ffmpeg),
        check_tool_at("ffprobe", &toolchain.ffprobe),
    ]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!("configured {name} path {:?} does not exist, searching PATH", path);
    }

    require_tool(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tool_not_found() {
        let info = check_tool("nonexistent_tool_12345");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert!(info.path.is_none());
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let err = require_tool("nonexistent_tool_12345").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn configured_path_wins_when_present() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved = get_tool_path("nonexistent_tool_12345", Some(file.path())).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn check_tools_reports_both() {
        let toolchain = Toolchain::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let infos = check_tools(&toolchain);
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["ffmpeg", "ffprobe"]);
        assert!(infos.iter().all(|i| !i.available));
    }
}
