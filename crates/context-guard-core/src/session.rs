//! Session Opener: restoration checklist at session start, resume, or reset.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::event::{parse_event, SessionEvent, SessionKind};
use crate::git::RepoContext;
use crate::probe::ServiceProbe;

pub const RESTORE_HEADER: &str = "Please immediately perform these restoration steps:";

pub const WELCOME_FALLBACK: &str = "🚀 Session started. Ready to help!";

const RESTORE_STEPS: &[&str] = &[
    "1. 🧠 Use recall to check recent memories and context",
    "2. 💾 Use restore_session to restore the latest session state",
    "3. ✅ Use view_todos to see any pending tasks",
    "4. 📋 Use show_activity to see recent project work if needed",
    "5. 📣 Summarize what you restored:",
    "   - What was being worked on",
    "   - Current status and progress",
    "   - Next steps or pending items",
];

const FRESH_STEPS: &[&str] = &[
    "Starting fresh! Consider:",
    "- Use recall to check if there's relevant context",
    "- Use show_activity if you want to see recent project work",
    "- Use discover_projects to see what projects have knowledge",
];

fn header(kind: &SessionKind) -> &'static str {
    match kind {
        SessionKind::Resume => "🔄 RESUMING SESSION - Restoring Context",
        SessionKind::Startup => "🚀 STARTUP - Welcome Back",
        SessionKind::Clear | SessionKind::Other(_) => "✨ NEW SESSION - Fresh Start",
    }
}

/// Repository lines; each appears only when its data is present.
fn repo_lines(repo: &RepoContext) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(branch) = &repo.branch {
        lines.push(format!("📂 Git Branch: {branch}"));
    }
    if repo.uncommitted_count > 0 {
        lines.push(format!("⚠️  {} uncommitted changes", repo.uncommitted_count));
    }
    if let Some(commits) = repo.recent_commits.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("📝 Recent commits:\n{commits}"));
    }
    lines
}

/// Templated banner for a reachable knowledge service.
pub fn session_instructions(kind: &SessionKind, repo: &RepoContext) -> String {
    let mut lines: Vec<String> = vec![header(kind).to_string(), String::new()];

    let repo = repo_lines(repo);
    if !repo.is_empty() {
        lines.extend(repo);
        lines.push(String::new());
    }

    if kind.is_restoring() {
        lines.push(RESTORE_HEADER.to_string());
        lines.push(String::new());
        lines.extend(RESTORE_STEPS.iter().map(|s| s.to_string()));
        lines.push(String::new());
        lines.push("Then ask how I'd like to continue.".to_string());
    } else {
        lines.extend(FRESH_STEPS.iter().map(|s| s.to_string()));
        lines.push(String::new());
        lines.push("Ready for your first task!".to_string());
    }

    lines.join("\n")
}

/// Replaces the whole banner when the knowledge service is down.
pub fn unavailable_notice(kind: &SessionKind, repo: &RepoContext) -> String {
    let branch = repo.branch.as_deref().unwrap_or("unknown");
    format!(
        "🚀 SESSION STARTED\n\
         \n\
         Git Branch: {branch}\n\
         Session Type: {kind}\n\
         \n\
         Note: the knowledge service may not be running.\n\
         You can still use built-in tools for development tasks.\n\
         \n\
         Ready to help!"
    )
}

/// Entry point for the session-start event.
///
/// Git queries run in the event's `cwd`, falling back to `default_dir`.
pub async fn run_session_start(
    raw: &[u8],
    default_dir: &Path,
    probe: &dyn ServiceProbe,
    git_timeout: Duration,
) -> String {
    let event: SessionEvent = match parse_event(raw) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "session event unreadable, emitting welcome");
            return WELCOME_FALLBACK.to_string();
        }
    };

    let kind = event.kind();
    let dir = event.cwd().unwrap_or(default_dir);
    let repo = RepoContext::gather(dir, git_timeout).await;
    debug!(?repo, dir = %dir.display(), "repository context");

    let reachability = probe.check().await;
    info!(
        session_id = event.session_id(),
        matcher = %kind,
        ?reachability,
        "session start"
    );

    if reachability.is_available() {
        session_instructions(&kind, &repo)
    } else {
        unavailable_notice(&kind, &repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;

    fn sample_repo() -> RepoContext {
        RepoContext {
            branch: Some("main".to_string()),
            uncommitted_count: 3,
            recent_commits: Some("abc123 fix bug".to_string()),
        }
    }

    #[test]
    fn resume_orders_branch_count_then_checklist() {
        let out = session_instructions(&SessionKind::Resume, &sample_repo());
        let branch = out.find("Git Branch: main").unwrap();
        let count = out.find("3 uncommitted changes").unwrap();
        let checklist = out.find(RESTORE_HEADER).unwrap();
        assert!(branch < count && count < checklist);
        assert!(out.starts_with("🔄 RESUMING SESSION"));
        assert!(out.contains("abc123 fix bug"));
    }

    #[test]
    fn startup_gets_checklist() {
        let out = session_instructions(&SessionKind::Startup, &RepoContext::default());
        assert!(out.contains(RESTORE_HEADER));
        assert!(out.contains("restore_session"));
        assert!(out.ends_with("Then ask how I'd like to continue."));
    }

    #[test]
    fn clear_and_unknown_get_fresh_list() {
        for kind in [SessionKind::Clear, SessionKind::Other("compact".to_string())] {
            let out = session_instructions(&kind, &RepoContext::default());
            assert!(out.starts_with("✨ NEW SESSION"));
            assert!(out.contains("Starting fresh!"));
            assert!(!out.contains(RESTORE_HEADER));
        }
    }

    #[test]
    fn repo_lines_are_independent() {
        let repo = RepoContext {
            branch: None,
            uncommitted_count: 2,
            recent_commits: None,
        };
        let out = session_instructions(&SessionKind::Startup, &repo);
        assert!(!out.contains("Git Branch"));
        assert!(out.contains("2 uncommitted changes"));
        assert!(!out.contains("Recent commits"));
    }

    #[test]
    fn clean_tree_omits_count_line() {
        let repo = RepoContext {
            uncommitted_count: 0,
            ..sample_repo()
        };
        let out = session_instructions(&SessionKind::Resume, &repo);
        assert!(!out.contains("uncommitted"));
    }

    #[test]
    fn empty_repo_context_has_no_repo_block() {
        let out = session_instructions(&SessionKind::Resume, &RepoContext::default());
        assert!(out.starts_with(&format!("{}\n\n{RESTORE_HEADER}", header(&SessionKind::Resume))));
    }

    #[test]
    fn unavailable_notice_reports_branch_and_kind() {
        let out = unavailable_notice(&SessionKind::Resume, &sample_repo());
        assert!(out.contains("Git Branch: main"));
        assert!(out.contains("Session Type: resume"));
        assert!(out.contains("may not be running"));

        let out = unavailable_notice(&SessionKind::Startup, &RepoContext::default());
        assert!(out.contains("Git Branch: unknown"));
    }

    #[tokio::test]
    async fn unreachable_service_overrides_template() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_session_start(
            br#"{"matcher":"resume"}"#,
            dir.path(),
            &StaticProbe::unreachable(),
            Duration::from_secs(5),
        )
        .await;
        assert!(out.contains("may not be running"));
        assert!(!out.contains(RESTORE_HEADER));
    }

    #[tokio::test]
    async fn malformed_input_emits_welcome() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_session_start(
            b"<<garbage>>",
            dir.path(),
            &StaticProbe::reachable(),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(out, WELCOME_FALLBACK);
    }
}
