//! Intent categories and the persistence directives they trigger.
//!
//! Classification is a case-insensitive substring scan over an ordered table.
//! Each category contributes at most one directive, in table order.

/// Intent categories, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Commit,
    Bugfix,
    Feature,
    Design,
    Refactor,
    SessionEnd,
    Tasks,
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub kind: CategoryKind,
    /// Lowercase substrings; any hit selects the category.
    pub keywords: &'static [&'static str],
    pub directive: &'static str,
}

impl Category {
    /// `lowered` must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        contains_any(lowered, self.keywords)
    }
}

pub const CATEGORIES: &[Category] = &[
    Category {
        kind: CategoryKind::Commit,
        keywords: &["git commit", "commit the", "commit these changes"],
        directive: "IMPORTANT: After creating the git commit, immediately use remember \
                    to capture the commit details and store_knowledge with type='WorkNote' \
                    to preserve it long-term.",
    },
    Category {
        kind: CategoryKind::Bugfix,
        keywords: &["fix", "bug", "error", "issue", "broken"],
        directive: "After fixing this issue, use remember to capture the solution and \
                    store_knowledge with type='TechnicalDebt' for long-term reference.",
    },
    Category {
        kind: CategoryKind::Feature,
        keywords: &["implement", "add feature", "create", "build"],
        directive: "When you complete this implementation, use snapshot to preserve \
                    the session state with what was accomplished.",
    },
    Category {
        kind: CategoryKind::Design,
        keywords: &["design", "architecture", "pattern", "approach", "strategy"],
        directive: "If you make any architectural decisions, use remember for immediate \
                    context and store_knowledge with type='ProjectInsight' for long-term \
                    preservation.",
    },
    Category {
        kind: CategoryKind::Refactor,
        keywords: &["refactor", "clean up", "improve", "optimize"],
        directive: "After refactoring, use remember to capture what was changed and \
                    store_knowledge with type='ProjectInsight' to document improvements.",
    },
    Category {
        kind: CategoryKind::SessionEnd,
        keywords: &["done", "finished", "complete", "end", "wrap up"],
        directive: "Before ending, please use save_session to preserve the current session \
                    state including what was accomplished and any next steps.",
    },
    Category {
        kind: CategoryKind::Tasks,
        keywords: &["todo", "task", "checklist", "need to"],
        directive: "Consider using create_todo_list if you're breaking down work into \
                    multiple tasks.",
    },
];

/// Markers of a quick question; these suppress the generic reminder.
pub const SIMPLE_QUESTION_MARKERS: &[&str] = &[
    "what is", "how do", "explain", "show me", "list", "find", "search", "read", "look at",
    "check", "tell me",
];

/// Markers of a change request; these enable the generic reminder.
pub const ACTION_MARKERS: &[&str] = &[
    "modify",
    "change",
    "update",
    "create",
    "delete",
    "add",
    "remove",
    "implement",
    "fix",
    "build",
    "develop",
    "write",
    "edit",
];

pub const GENERIC_REMINDER: &str = "💡 REMINDER: For significant work, consider using \
                                    remember for immediate context and \
                                    snapshot/store_knowledge to preserve insights and \
                                    progress.";

/// A directive selected for one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub kind: CategoryKind,
    pub text: &'static str,
}

/// Run the prompt through [`CATEGORIES`] once, in table order.
pub fn detect_directives(prompt: &str) -> Vec<Directive> {
    let lowered = prompt.to_lowercase();
    CATEGORIES
        .iter()
        .filter(|c| c.matches(&lowered))
        .map(|c| Directive {
            kind: c.kind,
            text: c.directive,
        })
        .collect()
}

/// Whether a prompt with no category hits still earns the generic reminder.
///
/// Simple-question markers win over action markers.
pub fn should_remind(prompt: &str) -> bool {
    let lowered = prompt.to_lowercase();
    if contains_any(&lowered, SIMPLE_QUESTION_MARKERS) {
        return false;
    }
    contains_any(&lowered, ACTION_MARKERS)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
