//! Runtime settings for the interceptors.

use std::path::PathBuf;
use std::time::Duration;

use crate::backup::BackupStore;
use crate::git::DEFAULT_GIT_TIMEOUT;
use crate::probe::{DEFAULT_HEALTH_URL, DEFAULT_PROBE_TIMEOUT};

pub const ENV_HEALTH_URL: &str = "CONTEXT_GUARD_HEALTH_URL";
pub const ENV_BACKUP_DIR: &str = "CONTEXT_GUARD_BACKUP_DIR";
pub const ENV_GIT_TIMEOUT_SECS: &str = "CONTEXT_GUARD_GIT_TIMEOUT_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "CONTEXT_GUARD_PROBE_TIMEOUT_SECS";

/// Interceptor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Knowledge service health endpoint
    pub health_url: String,
    /// Backup directory; `None` means the per-user default
    pub backup_dir: Option<PathBuf>,
    /// Bound on each git query
    pub git_timeout: Duration,
    /// Bound on the health probe
    pub probe_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            health_url: DEFAULT_HEALTH_URL.to_string(),
            backup_dir: None,
            git_timeout: DEFAULT_GIT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl GuardConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty or unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: Duration| {
            get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let defaults = Self::default();
        GuardConfig {
            health_url: get(ENV_HEALTH_URL).unwrap_or(defaults.health_url),
            backup_dir: get(ENV_BACKUP_DIR).map(PathBuf::from),
            git_timeout: secs(ENV_GIT_TIMEOUT_SECS, defaults.git_timeout),
            probe_timeout: secs(ENV_PROBE_TIMEOUT_SECS, defaults.probe_timeout),
        }
    }

    /// Backup store for this config, if a location can be resolved.
    pub fn backup_store(&self) -> Option<BackupStore> {
        match &self.backup_dir {
            Some(dir) => Some(BackupStore::new(dir)),
            None => BackupStore::in_home()
                .map_err(|e| tracing::warn!(error = %e, "no backup directory"))
                .ok(),
        }
    }
}
