//! Intermediate files and in-place replacement of an input.

use crate::naming::sibling_with_tag;
use crate::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Workspace for rewriting a single input file.
///
/// Intermediate files are siblings of the input, named after it, and are
/// removed when the workspace is dropped. The input itself is only touched
/// by [`Workspace::finalize`].
///
/// # Example
///
/// ```no_run
/// use clipforge_av::Workspace;
///
/// let mut workspace = Workspace::new("/uploads/42ab.mov.tmp")?;
/// let muxed = workspace.intermediate("_empty_audio")?;
/// // ... write the new contents to `muxed` ...
/// workspace.finalize(&muxed)?;
/// # Ok::<(), clipforge_av::Error>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    input_path: PathBuf,
    intermediates: Vec<PathBuf>,
}

impl Workspace {
    /// Create a new workspace for processing a file.
    pub fn new<P: AsRef<Path>>(input: P) -> Result<Self> {
        let input = input.as_ref();
        if input.file_name().is_none() {
            return Err(Error::InvalidInput(format!(
                "Invalid input file path: {}",
                input.display()
            )));
        }

        Ok(Self {
            input_path: input.to_path_buf(),
            intermediates: Vec::new(),
        })
    }

    /// Get the input file path.
    pub fn input(&self) -> &Path {
        &self.input_path
    }

    /// Reserve the sibling `<input><tag>.<ext>`, removing any stale file left
    /// there by an earlier run.
    pub fn intermediate(&mut self, tag: &str) -> Result<PathBuf> {
        let path = sibling_with_tag(&self.input_path, tag);
        remove_if_exists(&path)?;
        self.intermediates.push(path.clone());
        Ok(path)
    }

    /// Replace the input's contents with those of `result`.
    ///
    /// The bytes are copied into a hidden temp file in the input's directory
    /// which is then renamed over the input, so a concurrent reader sees
    /// either the old or the new contents. The input keeps its name, even
    /// when it carries a provisional suffix.
    pub fn finalize(&self, result: &Path) -> Result<()> {
        if !result.exists() {
            return Err(Error::Workspace(format!(
                "Output file does not exist: {:?}",
                result
            )));
        }
        replace_contents(result, &self.input_path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        for path in &self.intermediates {
            if let Err(e) = remove_if_exists(path) {
                tracing::warn!("failed to remove intermediate {:?}: {e}", path);
            }
        }
    }
}

/// Atomically replace `dest`'s contents with a copy of `source`.
pub fn replace_contents(source: &Path, dest: &Path) -> Result<()> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir)
        .map_err(|e| Error::Workspace(format!("Failed to create staging file: {e}")))?;
    let mut reader = std::fs::File::open(source)?;
    io::copy(&mut reader, staged.as_file_mut())?;
    staged.as_file().sync_all()?;

    staged
        .persist(dest)
        .map_err(|e| Error::Workspace(format!("Failed to replace {:?}: {}", dest, e.error)))?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn intermediate_is_named_after_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("42ab.mov.tmp");
        let mut ws = Workspace::new(&input).unwrap();

        let muxed = ws.intermediate("_empty_audio").unwrap();
        assert_eq!(muxed, dir.path().join("42ab.mov.tmp_empty_audio.mov"));
    }

    #[test]
    fn intermediate_clears_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        let stale = dir.path().join("clip.mp4_empty_audio.mp4");
        fs::write(&stale, b"stale").unwrap();

        let mut ws = Workspace::new(&input).unwrap();
        let reserved = ws.intermediate("_empty_audio").unwrap();
        assert_eq!(reserved, stale);
        assert!(!stale.exists());
    }

    #[test]
    fn finalize_keeps_input_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("42ab.mov.tmp");
        fs::write(&input, b"original").unwrap();

        let mut ws = Workspace::new(&input).unwrap();
        let result = ws.intermediate("_empty_audio").unwrap();
        fs::write(&result, b"processed").unwrap();

        ws.finalize(&result).unwrap();
        assert_eq!(fs::read_to_string(&input).unwrap(), "processed");
    }

    #[test]
    fn drop_removes_intermediates() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        fs::write(&input, b"original").unwrap();

        let result = {
            let mut ws = Workspace::new(&input).unwrap();
            let result = ws.intermediate("_empty_audio").unwrap();
            fs::write(&result, b"processed").unwrap();
            result
        };

        assert!(!result.exists());
        assert_eq!(fs::read_to_string(&input).unwrap(), "original");
    }

    #[test]
    fn finalize_fails_when_result_missing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        fs::write(&input, b"original").unwrap();

        let ws = Workspace::new(&input).unwrap();
        let result = ws.finalize(&dir.path().join("missing.mp4"));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&input).unwrap(), "original");
    }
}
