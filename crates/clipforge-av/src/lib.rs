//! # clipforge-av
//!
//! Normalization and concatenation of video clips through ffmpeg.
//!
//! This crate provides functionality for:
//! - Probing clips for their streams and video size
//! - Adding a silent soundtrack to clips without audio
//! - Normalizing a clip into a high-definition and a low-definition MP4
//! - Concatenating normalized clips into one playlist movie, either by
//!   stream copy ([`ConcatStrategy::Demuxer`]) or by re-encoding
//!   ([`ConcatStrategy::Filter`])
//!
//! Every operation is synchronous and takes the [`Toolchain`] to run with.
//! Choosing a concat strategy and falling back from one to the other is
//! left to the caller.
//!
//! ## Example
//!
//! ```no_run
//! use clipforge_av::{normalize, EncodingParameters, Toolchain};
//! use std::path::Path;
//!
//! let toolchain = Toolchain::from_path()?;
//! let params = EncodingParameters { width: None, height: 1080, fps: 24 };
//! let result = normalize(&toolchain, Path::new("/uploads/42ab.mov.tmp"), &params)?;
//! match result.error {
//!     None => println!("wrote {:?} and {:?}", result.high_def_path, result.low_def_path),
//!     Some(e) => eprintln!("normalization failed: {e}"),
//! }
//! # Ok::<(), clipforge_av::Error>(())
//! ```

pub mod command;
pub mod concat;
mod error;
pub mod geometry;
pub mod naming;
pub mod playlist;
pub mod probe;
pub mod soundtrack;
pub mod tools;
pub mod transcode;
pub mod workspace;

// Re-exports
pub use command::{run_ffmpeg, BuildResult, ToolCommand, ToolOutput};
pub use concat::{ConcatParams, ConcatStrategy};
pub use error::{Error, Result};
pub use geometry::{low_def_size, target_size, Dimensions, LOW_DEF_WIDTH};
pub use playlist::{build_playlist_movie, PlaylistItem};
pub use probe::{has_audio, probe_streams, video_size, ProbeReport, StreamInfo, StreamKind};
pub use soundtrack::{add_empty_soundtrack, ensure_soundtrack, SoundtrackOptions, SoundtrackOutcome};
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo, Toolchain};
pub use transcode::{normalize, EncodeProfile, EncodingParameters, NormalizationResult};
pub use workspace::Workspace;
