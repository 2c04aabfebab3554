//! Prompt Annotator: prepends persistence directives to a user prompt.

use tracing::{debug, warn};

use crate::directive::{detect_directives, should_remind, GENERIC_REMINDER};
use crate::event::{parse_event, PromptEvent};

pub const DIRECTIVE_HEADER: &str = "📝 AUTOMATIC KNOWLEDGE CAPTURE INSTRUCTIONS:";

/// Build the annotated prompt.
///
/// Directive lines come first, then a blank line, then `prompt` byte for
/// byte. With nothing to add the prompt is returned unchanged.
pub fn annotate_prompt(prompt: &str) -> String {
    let directives = detect_directives(prompt);

    let mut out = String::with_capacity(prompt.len());
    if !directives.is_empty() {
        out.push_str(DIRECTIVE_HEADER);
        out.push('\n');
        for directive in &directives {
            out.push_str("• ");
            out.push_str(directive.text);
            out.push('\n');
        }
        out.push('\n');
    } else if should_remind(prompt) {
        out.push_str(GENERIC_REMINDER);
        out.push_str("\n\n");
    }
    out.push_str(prompt);
    out
}

/// Entry point for the prompt-submit event.
///
/// Unparseable input is echoed back untouched so the request is never lost.
pub fn run_prompt_submit(raw: &[u8]) -> Vec<u8> {
    let event: PromptEvent = match parse_event(raw) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "prompt event unreadable, passing input through");
            return raw.to_vec();
        }
    };

    let annotated = annotate_prompt(event.prompt());
    debug!(
        session_id = event.session_id(),
        added_bytes = annotated.len() - event.prompt().len(),
        "annotated prompt"
    );
    annotated.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_prompt_is_returned_unchanged() {
        assert_eq!(annotate_prompt("hello there"), "hello there");
        assert_eq!(annotate_prompt(""), "");
    }

    #[test]
    fn commit_directive_precedes_prompt() {
        let out = annotate_prompt("git commit the work");
        let directive = out.find("type='WorkNote'").unwrap();
        let prompt = out.rfind("git commit the work").unwrap();
        assert!(directive < prompt);
        assert!(out.starts_with(DIRECTIVE_HEADER));
        assert!(out.ends_with("\n\ngit commit the work"));
    }

    #[test]
    fn every_directive_line_is_bulleted() {
        let out = annotate_prompt("fix the bug then refactor");
        let bullets: Vec<_> = out.lines().filter(|l| l.starts_with("• ")).collect();
        assert_eq!(bullets.len(), 2);
    }

    #[test]
    fn generic_reminder_for_unmatched_action() {
        let out = annotate_prompt("please modify the config loader");
        assert_eq!(out, format!("{GENERIC_REMINDER}\n\nplease modify the config loader"));
    }

    #[test]
    fn prompt_whitespace_is_preserved() {
        let prompt = "  fix this\r\n\ttrailing  \n";
        let out = annotate_prompt(prompt);
        assert!(out.ends_with(prompt));
    }

    #[test]
    fn run_passes_through_malformed_input() {
        let raw = b"not json at all \xff";
        assert_eq!(run_prompt_submit(raw), raw.to_vec());
    }

    #[test]
    fn run_annotates_event() {
        let out = run_prompt_submit(br#"{"session_id":"s1","prompt":"git commit now"}"#);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("WorkNote"));
        assert!(out.ends_with("git commit now"));
    }

    #[test]
    fn run_with_missing_prompt_emits_empty_text() {
        assert!(run_prompt_submit(br#"{"session_id":"s1"}"#).is_empty());
    }
}
