//! Typed event payloads delivered by the host on standard input.
//!
//! Every field is optional on the wire and decoded on its own: a missing,
//! null, or wrong-typed field becomes `None` without touching its siblings.
//! Accessors supply the documented defaults.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::InputError;

/// Session id reported when the host omits one.
pub const UNKNOWN_SESSION: &str = "unknown";

/// Why a compaction fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Context window exhausted.
    Auto,
    /// Requested by the user.
    Manual,
    /// Absent or unrecognised.
    Unknown,
}

impl Trigger {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "auto" => Trigger::Auto,
            "manual" => Trigger::Manual,
            _ => Trigger::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Auto => "auto",
            Trigger::Manual => "manual",
            Trigger::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-start subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    Startup,
    Resume,
    Clear,
    Other(String),
}

impl SessionKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "startup" => SessionKind::Startup,
            "resume" => SessionKind::Resume,
            "clear" => SessionKind::Clear,
            other => SessionKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SessionKind::Startup => "startup",
            SessionKind::Resume => "resume",
            SessionKind::Clear => "clear",
            SessionKind::Other(raw) => raw,
        }
    }

    /// Whether this kind continues earlier work and gets the full checklist.
    pub fn is_restoring(&self) -> bool {
        matches!(self, SessionKind::Startup | SessionKind::Resume)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for the pre-compaction interceptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompactionEvent {
    #[serde(deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub hook_event_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub transcript_path: Option<PathBuf>,
    #[serde(deserialize_with = "lenient")]
    pub trigger: Option<String>,
}

impl CompactionEvent {
    pub fn session_id(&self) -> &str {
        session_or_unknown(&self.session_id)
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
            .as_deref()
            .map(Trigger::parse)
            .unwrap_or(Trigger::Unknown)
    }

    /// Transcript path, ignoring an empty string.
    pub fn transcript_path(&self) -> Option<&Path> {
        self.transcript_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Payload for the session-start interceptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionEvent {
    #[serde(deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub hook_event_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub transcript_path: Option<PathBuf>,
    #[serde(deserialize_with = "lenient")]
    pub cwd: Option<PathBuf>,
    /// Newer hosts send this as `source`.
    #[serde(alias = "source", deserialize_with = "lenient")]
    pub matcher: Option<String>,
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        session_or_unknown(&self.session_id)
    }

    /// Session kind, `startup` when absent.
    pub fn kind(&self) -> SessionKind {
        SessionKind::parse(self.matcher.as_deref().unwrap_or("startup"))
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref().filter(|p| !p.as_os_str().is_empty())
    }
}

/// Payload for the prompt-submit interceptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptEvent {
    #[serde(deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub hook_event_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub transcript_path: Option<PathBuf>,
    #[serde(deserialize_with = "lenient")]
    pub cwd: Option<PathBuf>,
    #[serde(deserialize_with = "lenient")]
    pub prompt: Option<String>,
}

impl PromptEvent {
    pub fn session_id(&self) -> &str {
        session_or_unknown(&self.session_id)
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }
}

/// Decode a field, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn session_or_unknown(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or(UNKNOWN_SESSION)
}

/// Decode one event from raw standard input.
///
/// The input must be a single JSON object. Only non-JSON or non-object
/// input is an error; individual fields never are.
pub fn parse_event<T: DeserializeOwned>(raw: &[u8]) -> Result<T, InputError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(InputError::Empty);
    }

    let value: Value = serde_json::from_slice(raw)?;
    let kind = match &value {
        Value::Object(_) => return Ok(serde_json::from_value(value)?),
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
    };
    Err(InputError::NotObject(kind))
}
