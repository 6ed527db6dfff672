//! Job runner: stage inputs from the object store, run the pipeline and
//! publish the outputs.

use crate::build::{build_playlist_with_fallback, normalize_preview};
use crate::payload::{NormalizeJob, PlaylistJob};
use crate::storage::{
    fetch_if_missing, lowdef_key, movies_bucket, preview_key, source_key, staged_preview_name,
    ObjectStore,
};
use anyhow::{Context, Result};
use clipforge_av::{EncodingParameters, PlaylistItem, Toolchain};
use serde::Serialize;
use std::path::Path;

/// What a job needs besides its payload.
pub struct JobContext {
    pub toolchain: Toolchain,
    pub store: Box<dyn ObjectStore>,
}

impl JobContext {
    pub fn new(toolchain: Toolchain, store: impl ObjectStore + 'static) -> Self {
        Self {
            toolchain,
            store: Box::new(store),
        }
    }
}

/// Summary of a finished job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobReport {
    pub success: bool,
    /// Keys published to the store, in order.
    pub outputs: Vec<String>,
    pub message: String,
}

impl JobReport {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            outputs: Vec::new(),
            message: message.into(),
        }
    }
}

/// Normalize one uploaded preview and publish both tiers.
pub fn run_normalize_job(ctx: &JobContext, job: &NormalizeJob, workdir: &Path) -> Result<JobReport> {
    let id = job.preview_file_id.as_str();
    let bucket = movies_bucket(&job.bucket_prefix);
    let source = workdir.join(staged_preview_name(id));
    fetch_if_missing(ctx.store.as_ref(), &bucket, &source_key(id), &source)
        .with_context(|| format!("Failed to stage source of preview {id}"))?;

    let params = EncodingParameters {
        width: job.width,
        height: job.height,
        fps: job.fps,
    };
    let outcome = normalize_preview(&ctx.toolchain, &source, &params)?;
    if !outcome.result.success {
        tracing::error!("Normalization failed: {}", outcome.result.message);
        return Ok(JobReport::failed(outcome.result.message));
    }

    let high_key = preview_key(id);
    let low_key = lowdef_key(id);
    ctx.store.put(&outcome.files.high_def_path, &bucket, &high_key)?;
    ctx.store.put(&outcome.files.low_def_path, &bucket, &low_key)?;
    tracing::info!("Normalization succeeded {:?}", outcome.files.high_def_path);

    Ok(JobReport {
        success: true,
        outputs: vec![high_key, low_key],
        message: String::new(),
    })
}

/// Build a playlist movie from normalized previews and publish it.
pub fn run_playlist_job(ctx: &JobContext, job: &PlaylistJob, workdir: &Path) -> Result<JobReport> {
    let ids = job.input_ids()?;
    let bucket = movies_bucket(&job.bucket_prefix);

    let mut items = Vec::with_capacity(ids.len());
    for id in &ids {
        let name = staged_preview_name(id);
        let path = workdir.join(&name);
        fetch_if_missing(ctx.store.as_ref(), &bucket, &preview_key(id), &path)
            .with_context(|| format!("Failed to stage preview {id}"))?;
        items.push(PlaylistItem::new(path).with_label(name));
    }

    let file_name = Path::new(&job.output_filename)
        .file_name()
        .filter(|name| name.len() == job.output_filename.len())
        .with_context(|| format!("Invalid output filename: {:?}", job.output_filename))?;
    let output = workdir.join(file_name);

    let outcome = build_playlist_with_fallback(
        &ctx.toolchain,
        &items,
        &output,
        job.width,
        job.height,
        job.fps,
        job.full,
    )?;
    if !outcome.result.success {
        tracing::info!("Playlist creation failed: {}", outcome.result.message);
        return Ok(JobReport::failed(outcome.result.message));
    }

    ctx.store.put(&output, &bucket, &job.output_key)?;
    tracing::info!(
        "Playlist of {} previews built with {} and stored as {bucket}/{}",
        ids.len(),
        outcome.strategy,
        job.output_key
    );

    Ok(JobReport {
        success: true,
        outputs: vec![job.output_key.clone()],
        message: outcome.result.message,
    })
}
