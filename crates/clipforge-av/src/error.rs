//! Error types for clipforge-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while probing, repairing, encoding or concatenating.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The container could not be read or parsed.
    #[error("cannot probe {}: {message}", path.display())]
    Probe { path: PathBuf, message: String },

    /// The container holds no video stream.
    #[error("no video stream in {}", path.display())]
    NoVideoStream { path: PathBuf },

    /// Muxing a silent soundtrack exited with a nonzero code.
    #[error("soundtrack injection failed for {} (exit code {code}): {message}", path.display())]
    SoundtrackInjection {
        path: PathBuf,
        code: i32,
        message: String,
    },

    /// A transcode step exited with a nonzero code.
    #[error("{step} failed: {message}")]
    Encode { step: String, message: String },

    /// An input does not have the exact `video, audio` layout required for
    /// stream-copy concatenation.
    #[error("{detail}")]
    StreamLayoutMismatch { path: PathBuf, detail: String },

    /// The encoder process failed to spawn or exited with a nonzero code.
    #[error("{tool} exited with code {}: {stderr}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    EncoderProcess {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Temp file or in-place replacement error.
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a probe error.
    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an encode error for the given step.
    pub fn encode(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create a stream layout mismatch error.
    pub fn layout_mismatch(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::StreamLayoutMismatch {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
