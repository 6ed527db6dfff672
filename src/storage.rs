//! Object-store boundary.
//!
//! Jobs exchange files with an object store through [`ObjectStore`]. The
//! only implementation shipped here is [`LocalStore`], which maps buckets
//! to directories.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Bucket holding every movie object, before the deployment prefix.
pub const MOVIES_BUCKET: &str = "movies";

/// Store of objects addressed by bucket and key.
pub trait ObjectStore {
    /// Download `bucket/key` into `local_path`.
    fn get(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()>;

    /// Upload `local_path` as `bucket/key`, replacing any existing object.
    fn put(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()>;
}

/// Full name of the movies bucket for a deployment prefix.
pub fn movies_bucket(bucket_prefix: &str) -> String {
    format!("{bucket_prefix}{MOVIES_BUCKET}")
}

pub fn make_key(prefix: &str, id: &str) -> String {
    format!("{prefix}-{id}")
}

/// Key of an uploaded, not yet normalized preview.
pub fn source_key(id: &str) -> String {
    make_key("source", id)
}

/// Key of a normalized high-def preview.
pub fn preview_key(id: &str) -> String {
    make_key("previews", id)
}

/// Key of a normalized low-def preview.
pub fn lowdef_key(id: &str) -> String {
    make_key("lowdef", id)
}

/// Local file name a preview is staged under.
pub fn staged_preview_name(id: &str) -> String {
    format!("cache-previews-{id}.mp4")
}

/// Download `bucket/key` unless `local_path` already holds a non-empty file.
///
/// Returns whether a download happened.
pub fn fetch_if_missing(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    local_path: &Path,
) -> Result<bool> {
    let present = std::fs::metadata(local_path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false);
    if present {
        tracing::debug!("{:?} already staged, not fetching {bucket}/{key}", local_path);
        return Ok(false);
    }
    store.get(bucket, key, local_path)?;
    Ok(true)
}

/// Directory-backed store: object `bucket/key` lives at `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of an object. Buckets and keys are single path components.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        for (what, name) in [("bucket", bucket), ("key", key)] {
            if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
                anyhow::bail!("Invalid object {what}: {name:?}");
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

impl ObjectStore for LocalStore {
    fn get(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let source = self.object_path(bucket, key)?;
        if !source.is_file() {
            anyhow::bail!("Object {bucket}/{key} not found in {:?}", self.root);
        }
        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        std::fs::copy(&source, local_path)
            .with_context(|| format!("Failed to fetch {bucket}/{key} into {:?}", local_path))?;
        tracing::info!("fetched {bucket}/{key} into {:?}", local_path);
        Ok(())
    }

    fn put(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()> {
        let dest = self.object_path(bucket, key)?;
        let bucket_dir = self.root.join(bucket);
        std::fs::create_dir_all(&bucket_dir)
            .with_context(|| format!("Failed to create bucket directory: {:?}", bucket_dir))?;
        clipforge_av::workspace::replace_contents(local_path, &dest)
            .with_context(|| format!("Failed to store {:?} as {bucket}/{key}", local_path))?;
        tracing::info!("stored {:?} as {bucket}/{key}", local_path);
        Ok(())
    }
}
