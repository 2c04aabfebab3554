//! Compaction Guard: fires before conversation history is shortened.
//!
//! Auto compaction gets a mandatory save checklist, anything else a gentle
//! reminder. The transcript is copied aside first on a best-effort basis.

use tracing::{debug, info, warn};

use crate::backup::BackupStore;
use crate::event::{parse_event, CompactionEvent, Trigger};

pub const FORCE_SAVE_INSTRUCTIONS: &str = "\
🚨 CONTEXT COMPACTION IMMINENT - SAVE NOW!

The context window is full and will be automatically compacted. You MUST immediately:

1. Use save_session to preserve the current session state
   - Include what has been accomplished this session
   - Note any pending tasks or next steps
   - Record any important insights or decisions

2. Use remember to capture immediate working context that would be lost

3. Use store_knowledge for any critical findings:
   - Technical debt or bugs discovered (type='TechnicalDebt')
   - Architectural decisions made (type='ProjectInsight')
   - Important work notes (type='WorkNote')

4. If there are incomplete TODOs, use create_todo_list to preserve them

DO THESE FOUR THINGS NOW before context is lost!

After saving, you may proceed with the user's request.";

pub const SAVE_REMINDER: &str = "\
💡 Manual compaction requested. Consider saving important context:

Before compacting, you might want to:
- Use save_session if significant work was done
- Use remember to capture immediate working context
- Use store_knowledge for any insights worth preserving
- Use create_todo_list for any pending tasks

Then proceed with compaction as requested.";

/// Only an exhausted context window forces a save.
pub fn should_force_save(trigger: Trigger) -> bool {
    trigger == Trigger::Auto
}

pub fn save_instructions(trigger: Trigger) -> &'static str {
    if should_force_save(trigger) {
        FORCE_SAVE_INSTRUCTIONS
    } else {
        SAVE_REMINDER
    }
}

/// Entry point for the pre-compact event.
///
/// `store` is `None` when no backup location could be resolved. Backup
/// failures are logged and never change the returned text.
pub fn run_pre_compact(raw: &[u8], store: Option<&BackupStore>) -> String {
    let event: CompactionEvent = match parse_event(raw) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "compaction event unreadable, emitting reminder");
            return save_instructions(Trigger::Unknown).to_string();
        }
    };

    let trigger = event.trigger();
    let session_id = event.session_id();

    match (event.transcript_path(), store) {
        (Some(transcript), Some(store)) => match store.backup(transcript, session_id, trigger) {
            Ok(path) => info!(session_id, %trigger, backup = %path.display(), "transcript backed up"),
            Err(e) => warn!(session_id, %trigger, error = %e, "transcript backup skipped"),
        },
        (Some(_), None) => debug!(session_id, "no backup directory available"),
        (None, _) => debug!(session_id, "no transcript path in event"),
    }

    save_instructions(trigger).to_string()
}
