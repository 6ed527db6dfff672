//! Concatenation strategies.
//!
//! - [`ConcatStrategy::Demuxer`] stream-copies inputs that share one codec
//!   layout. Fast, but only the stream count, types and order are checked
//!   up front; a codec parameter mismatch only shows up as an encoder
//!   failure.
//! - [`ConcatStrategy::Filter`] re-encodes through a filter graph and
//!   tolerates heterogeneous inputs.
//!
//! Which one to run, and when to fall back, is the caller's decision.

mod demuxer;
mod filter;

pub use demuxer::{check_stream_layout, concat_demuxer, concat_list, demuxer_args};
pub use filter::{concat_filter, filter_args, filter_graph};

use crate::command::BuildResult;
use crate::{Result, Toolchain};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Output geometry and frame rate shared by both strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcatParams {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Way of merging already-normalized clips into one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatStrategy {
    /// Concat demuxer with stream copy.
    Demuxer,
    /// Filter-graph concatenation with a full re-encode.
    Filter,
}

impl ConcatStrategy {
    /// Merge `inputs`, in order, into `output`.
    ///
    /// # Errors
    ///
    /// Probing an input that vanished is an error; every encoder or
    /// validation failure is a failed [`BuildResult`].
    pub fn concat(
        self,
        toolchain: &Toolchain,
        inputs: &[PathBuf],
        output: &Path,
        params: &ConcatParams,
    ) -> Result<BuildResult> {
        if inputs.is_empty() {
            return Ok(BuildResult::failed("no input files to concatenate"));
        }
        match self {
            ConcatStrategy::Demuxer => concat_demuxer(toolchain, inputs, output, params),
            ConcatStrategy::Filter => concat_filter(toolchain, inputs, output, params),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConcatStrategy::Demuxer => "concat_demuxer",
            ConcatStrategy::Filter => "concat_filter",
        }
    }
}

impl fmt::Display for ConcatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
