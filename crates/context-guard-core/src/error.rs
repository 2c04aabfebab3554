//! Error taxonomy for context-guard sub-operations.
//!
//! None of these ever reach the host. Each interceptor maps a failed
//! sub-operation to a documented default and keeps going.

use std::path::PathBuf;
use std::time::Duration;

/// Errors produced while decoding an event from standard input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("malformed event JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("event input is empty")]
    Empty,

    #[error("event must be a JSON object, got {0}")]
    NotObject(&'static str),
}

/// Errors produced by a single read-only git query.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("git {command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("git {command} returned empty output")]
    EmptyOutput { command: String },
}

/// Errors produced while copying a transcript into the backup directory.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("transcript not found: {}", .0.display())]
    TranscriptMissing(PathBuf),

    #[error("unsafe backup file name component: {0:?}")]
    UnsafeComponent(String),

    #[error("no home directory to root the backup directory under")]
    NoHomeDir,

    #[error("backup io error: {0}")]
    Io(#[from] std::io::Error),
}
