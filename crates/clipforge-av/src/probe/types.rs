//! Stream inventory types.

use crate::geometry::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Type of a container stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
    /// Subtitles, data, attachments.
    Other,
}

impl StreamKind {
    /// Map an ffprobe `codec_type` string.
    pub fn from_codec_type(codec_type: &str) -> Self {
        match codec_type {
            "video" => StreamKind::Video,
            "audio" => StreamKind::Audio,
            _ => StreamKind::Other,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
            StreamKind::Other => write!(f, "other"),
        }
    }
}

/// One stream of a probed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Absolute stream index inside the container.
    pub index: u32,
    pub kind: StreamKind,
    /// Codec name as reported by ffprobe (e.g. "h264", "aac").
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Stream inventory of a media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Path that was probed.
    pub path: PathBuf,
    /// Streams in container order.
    pub streams: Vec<StreamInfo>,
}

impl ProbeReport {
    /// True iff at least one stream is audio.
    pub fn has_audio(&self) -> bool {
        self.streams.iter().any(|s| s.kind == StreamKind::Audio)
    }

    /// The first video stream, if any.
    pub fn first_video(&self) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.kind == StreamKind::Video)
    }

    /// Size of the first video stream.
    pub fn video_size(&self) -> Option<Dimensions> {
        self.first_video().map(|v| Dimensions {
            width: v.width.unwrap_or(0),
            height: v.height.unwrap_or(0),
        })
    }

    /// Stream kinds in container order.
    pub fn kinds(&self) -> Vec<StreamKind> {
        self.streams.iter().map(|s| s.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(index: u32, kind: StreamKind) -> StreamInfo {
        StreamInfo {
            index,
            kind,
            codec_name: None,
            width: (kind == StreamKind::Video).then_some(640),
            height: (kind == StreamKind::Video).then_some(360),
        }
    }

    #[test]
    fn first_video_skips_leading_audio() {
        let report = ProbeReport {
            path: PathBuf::from("/clips/a.mp4"),
            streams: vec![stream(0, StreamKind::Audio), stream(1, StreamKind::Video)],
        };
        assert_eq!(report.first_video().map(|s| s.index), Some(1));
        assert_eq!(report.video_size(), Some(Dimensions::new(640, 360)));
        assert!(report.has_audio());
    }

    #[test]
    fn video_only_has_no_audio() {
        let report = ProbeReport {
            path: PathBuf::from("/clips/b.m4v"),
            streams: vec![stream(0, StreamKind::Video)],
        };
        assert!(!report.has_audio());
        assert_eq!(report.kinds(), vec![StreamKind::Video]);
    }

    #[test]
    fn unknown_codec_types_are_other() {
        assert_eq!(StreamKind::from_codec_type("subtitle"), StreamKind::Other);
        assert_eq!(StreamKind::from_codec_type("data"), StreamKind::Other);
        assert_eq!(StreamKind::from_codec_type("audio"), StreamKind::Audio);
    }
}
