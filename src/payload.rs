//! Versioned JSON job payloads.
//!
//! A payload is a JSON object with a `version` field (an integer, or a
//! string holding one). Only versions up to [`PAYLOAD_VERSION`] are
//! understood.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;

/// Highest payload version this build understands.
pub const PAYLOAD_VERSION: i64 = 1;

/// Normalize one uploaded preview into its high-def and low-def tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeJob {
    pub version: i64,
    #[serde(default)]
    pub width: Option<u32>,
    pub height: u32,
    pub fps: u32,
    pub preview_file_id: String,
    #[serde(default)]
    pub bucket_prefix: String,
}

/// Concatenate already-normalized previews into one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistJob {
    pub version: i64,
    #[serde(default)]
    pub width: Option<u32>,
    pub height: u32,
    pub fps: u32,
    /// Preview ids, see [`encode_input_ids`].
    pub input: String,
    pub output_filename: String,
    pub output_key: String,
    /// Skip the stream-copy attempt.
    #[serde(default, deserialize_with = "bool_or_true_string")]
    pub full: bool,
    #[serde(default)]
    pub bucket_prefix: String,
}

impl PlaylistJob {
    /// Preview ids of the playlist, in playback order.
    pub fn input_ids(&self) -> Result<Vec<String>> {
        decode_input_ids(&self.input)
    }
}

/// Read and decode a payload file.
pub fn load_payload<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Payload file {:?} doesn't exist or is unreadable", path))?;
    parse_payload(&content)
}

/// Decode a payload after checking its version.
pub fn parse_payload<T: DeserializeOwned>(content: &str) -> Result<T> {
    let mut value: Value = serde_json::from_str(content).context("Payload is not valid JSON")?;
    let version = check_version(&value)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("version".to_string(), Value::from(version));
    }
    serde_json::from_value(value).context("Input parameters: invalid payload")
}

/// Extract the payload version, rejecting missing, unparseable or too
/// recent ones.
pub fn check_version(payload: &Value) -> Result<i64> {
    let version = match payload.get("version") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match version {
        Some(v) if v <= PAYLOAD_VERSION => Ok(v),
        Some(v) => anyhow::bail!("Input parameters: unsupported format (version: {v})"),
        None => anyhow::bail!("Input parameters: unsupported format (version: None)"),
    }
}

/// Pack preview ids the way [`PlaylistJob::input`] expects them: a JSON
/// array, zlib-compressed, then base64-encoded.
pub fn encode_input_ids<S: AsRef<str>>(ids: &[S]) -> Result<String> {
    let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    let json = serde_json::to_vec(&ids)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Inverse of [`encode_input_ids`]. Numeric ids are accepted too.
pub fn decode_input_ids(input: &str) -> Result<Vec<String>> {
    let compressed = STANDARD
        .decode(input.trim())
        .context("Playlist input is not valid base64")?;
    let mut json = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .context("Playlist input is not zlib-compressed")?;

    let ids: Vec<Value> =
        serde_json::from_str(&json).context("Playlist input is not a JSON array")?;
    ids.into_iter()
        .map(|id| match id {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => anyhow::bail!("Unexpected preview id in playlist input: {other}"),
        })
        .collect()
}

fn bool_or_true_string<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s == "true",
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_accepts_int_and_string() {
        assert_eq!(check_version(&serde_json::json!({"version": 1})).unwrap(), 1);
        assert_eq!(check_version(&serde_json::json!({"version": "1"})).unwrap(), 1);
        assert_eq!(check_version(&serde_json::json!({"version": 0})).unwrap(), 0);
    }

    #[test]
    fn version_rejects_future_and_missing() {
        let err = check_version(&serde_json::json!({"version": 2})).unwrap_err();
        assert_eq!(err.to_string(), "Input parameters: unsupported format (version: 2)");

        let err = check_version(&serde_json::json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Input parameters: unsupported format (version: None)");

        assert!(check_version(&serde_json::json!({"version": "one"})).is_err());
    }

    #[test]
    fn input_ids_survive_packing() {
        let ids = ["a1b2", "c3d4", "e5f6"];
        let packed = encode_input_ids(&ids).unwrap();
        assert_eq!(decode_input_ids(&packed).unwrap(), ids);
    }

    #[test]
    fn numeric_input_ids_become_strings() {
        let json = b"[12, \"x\"]";
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json).unwrap();
        let packed = STANDARD.encode(encoder.finish().unwrap());
        assert_eq!(decode_input_ids(&packed).unwrap(), vec!["12", "x"]);
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert!(decode_input_ids("not base64!").is_err());
        assert!(decode_input_ids(&STANDARD.encode(b"plain text")).is_err());
    }

    #[test]
    fn playlist_full_flag_accepts_bool_and_string() {
        let base = |full: Value| {
            serde_json::json!({
                "version": "1",
                "width": null,
                "height": 1080,
                "fps": 25,
                "input": "",
                "output_filename": "playlist.mp4",
                "output_key": "playlists-9",
                "full": full,
                "bucket_prefix": "prod-",
            })
            .to_string()
        };

        let job: PlaylistJob = parse_payload(&base(Value::from("true"))).unwrap();
        assert!(job.full);
        assert_eq!(job.version, 1);
        assert_eq!(job.width, None);

        let job: PlaylistJob = parse_payload(&base(Value::from(true))).unwrap();
        assert!(job.full);

        let job: PlaylistJob = parse_payload(&base(Value::from("false"))).unwrap();
        assert!(!job.full);
    }

    #[test]
    fn normalize_job_defaults() {
        let job: NormalizeJob = parse_payload(
            r#"{"version": 1, "height": 720, "fps": 24, "preview_file_id": "42ab"}"#,
        )
        .unwrap();
        assert_eq!(job.width, None);
        assert_eq!(job.bucket_prefix, "");
    }

    #[test]
    fn unsupported_version_stops_parsing() {
        let err = parse_payload::<NormalizeJob>(
            r#"{"version": 3, "height": 720, "fps": 24, "preview_file_id": "42ab"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported format"));
    }
}
