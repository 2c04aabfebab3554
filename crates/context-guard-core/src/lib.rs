//! context-guard Core Library
//!
//! Lifecycle interceptors that keep an assistant's working context alive.
//! Each interceptor reads one JSON event, decides which instructions to
//! inject, and returns the text the host appends to the assistant's context:
//!
//! - [`compaction`]: before history is compacted
//! - [`session`]: at session start, resume, or reset
//! - [`annotate`]: on every submitted prompt
//!
//! None of the `run_*` entry points can fail. Malformed input and failed
//! side effects degrade the output instead.

pub mod annotate;
pub mod backup;
pub mod compaction;
pub mod config;
pub mod directive;
pub mod error;
pub mod event;
pub mod git;
pub mod probe;
pub mod session;
pub mod telemetry;

pub use annotate::{annotate_prompt, run_prompt_submit};
pub use backup::{backup_file_name, BackupStore};
pub use compaction::{run_pre_compact, save_instructions, should_force_save};
pub use config::GuardConfig;
pub use directive::{
    detect_directives, should_remind, Category, CategoryKind, Directive, CATEGORIES,
};
pub use error::{BackupError, GitError, InputError};
pub use event::{
    parse_event, CompactionEvent, PromptEvent, SessionEvent, SessionKind, Trigger,
};
pub use git::RepoContext;
pub use probe::{HttpProbe, Reachability, ServiceProbe, StaticProbe};
pub use session::{run_session_start, session_instructions, unavailable_notice};
pub use telemetry::init_tracing;

/// context-guard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
