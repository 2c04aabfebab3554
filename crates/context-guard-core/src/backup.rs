//! Transcript backups taken before compaction.
//!
//! Layout: `<root>/<session8>_pre_compact_<trigger>_<YYYYmmdd_HHMMSS>.jsonl`

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::BackupError;
use crate::event::{Trigger, UNKNOWN_SESSION};

/// Backup directory relative to the user's home.
pub const DEFAULT_BACKUP_SUBDIR: &str = ".coa/knowledge/transcript_backups";

const SESSION_PREFIX_LEN: usize = 8;

/// Write-only store for transcript copies.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    /// The directory is created on first backup, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `~/.coa/knowledge/transcript_backups`.
    pub fn in_home() -> Result<Self, BackupError> {
        let home = dirs::home_dir().ok_or(BackupError::NoHomeDir)?;
        Ok(Self::new(home.join(DEFAULT_BACKUP_SUBDIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `transcript` into the store, stamped with the current local time.
    pub fn backup(
        &self,
        transcript: &Path,
        session_id: &str,
        trigger: Trigger,
    ) -> Result<PathBuf, BackupError> {
        self.backup_at(transcript, session_id, trigger, Local::now())
    }

    pub fn backup_at(
        &self,
        transcript: &Path,
        session_id: &str,
        trigger: Trigger,
        at: DateTime<Local>,
    ) -> Result<PathBuf, BackupError> {
        if !transcript.is_file() {
            return Err(BackupError::TranscriptMissing(transcript.to_path_buf()));
        }

        let target = self.root.join(backup_file_name(session_id, trigger, at)?);
        fs::create_dir_all(&self.root)?;
        fs::copy(transcript, &target)?;
        Ok(target)
    }
}

/// Deterministic backup file name.
///
/// Rejects session ids that would escape the backup directory.
pub fn backup_file_name(
    session_id: &str,
    trigger: Trigger,
    at: DateTime<Local>,
) -> Result<String, BackupError> {
    let short = session_prefix(session_id);
    if !is_safe_component(&short) {
        return Err(BackupError::UnsafeComponent(short));
    }
    Ok(format!(
        "{short}_pre_compact_{trigger}_{}.jsonl",
        at.format("%Y%m%d_%H%M%S")
    ))
}

fn session_prefix(session_id: &str) -> String {
    if session_id == UNKNOWN_SESSION {
        return UNKNOWN_SESSION.to_string();
    }
    session_id.chars().take(SESSION_PREFIX_LEN).collect()
}

fn is_safe_component(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
