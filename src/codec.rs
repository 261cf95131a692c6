//! Conversion between raw todo.txt lines and [`Task`] values.
//!
//! ```text
//! line       := [completion] [priority] [creation] text [tags]
//! completion := "x " date " "
//! priority   := "(" UPPER ") "
//! creation   := date " "
//! tags       := { " +" token | " @" token | " due:" date | " rec:" amount unit }
//! ```
//!
//! Parsing is lenient: anything that does not fit the grammar stays in the
//! free text, and tags may appear anywhere, even before the priority.
//! Serializing always writes the fields in the order above with single
//! spaces, so `parse_line(&serialize(&t)) == t` for any valid task.

use chrono::NaiveDate;
use tracing::trace;

use crate::extension::ExtensionRegistry;
use crate::fields::Priority;
use crate::recurrence::Recurrence;
use crate::task::Task;
use crate::validation::{format_date, is_valid_due_date, is_valid_token, parse_date};

/// Fields found in the free-text part of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub text: String,
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    pub due: Option<NaiveDate>,
    pub recurrence: Option<Recurrence>,
}

/// Parse a raw line with the standard extractors.
pub fn parse_line(raw: &str) -> Task {
    parse_line_with(raw, ExtensionRegistry::standard())
}

/// Parse a raw line, running `registry` over it to pull out `key:value` tags.
///
/// Tags are removed before the completion, priority and creation markers are
/// read, so the markers are recognised at the head of whatever remains.
pub fn parse_line_with(raw: &str, registry: &ExtensionRegistry) -> Task {
    let body = parse_body_with(raw, registry);
    let mut task = Task {
        projects: body.projects,
        contexts: body.contexts,
        due: body.due,
        recurrence: body.recurrence,
        ..Task::default()
    };

    let mut rest = body.text.as_str();
    if let Some(after_marker) = rest.strip_prefix("x ") {
        if let Some((done, after)) = strip_leading_date(after_marker) {
            task.complete = true;
            task.completed_date = Some(done);
            rest = after;
        }
    }
    if let Some((priority, after)) = strip_priority(rest) {
        task.priority = Some(priority);
        rest = after;
    }
    if let Some((created, after)) = strip_leading_date(rest) {
        task.creation_date = Some(created);
        rest = after;
    }
    task.text = rest.to_string();

    trace!(line = raw, ?task, "parsed line");
    task
}

/// Parse free text with the standard extractors.
pub fn parse_body(fragment: &str) -> Body {
    parse_body_with(fragment, ExtensionRegistry::standard())
}

/// Pull `due:`/`rec:` tags, then `+project` and `@context` tokens, out of `fragment`.
///
/// Tokens whose value fails the token pattern (`+a+b`, a bare `@`) stay in the text.
pub fn parse_body_with(fragment: &str, registry: &ExtensionRegistry) -> Body {
    let extracted = registry.apply(fragment);
    let mut body = Body {
        due: extracted.due,
        recurrence: extracted.recurrence,
        ..Body::default()
    };

    let mut words: Vec<&str> = Vec::new();
    for token in extracted.residual.split_whitespace() {
        if let Some(name) = token.strip_prefix('+').filter(|n| is_valid_token(n)) {
            push_unique(&mut body.projects, name);
        } else if let Some(name) = token.strip_prefix('@').filter(|n| is_valid_token(n)) {
            push_unique(&mut body.contexts, name);
        } else {
            words.push(token);
        }
    }
    body.text = words.join(" ");
    body
}

/// Render `task` as a canonical line.
pub fn serialize(task: &Task) -> String {
    let mut parts: Vec<String> = Vec::new();

    if task.complete {
        parts.push("x".into());
        if let Some(done) = task.completed_date {
            parts.push(format_date(done));
        }
    }
    if let Some(p) = task.priority {
        parts.push(format!("({p})"));
    }
    if let Some(created) = task.creation_date {
        parts.push(format_date(created));
    }
    if !task.text.is_empty() {
        parts.push(task.text.clone());
    }
    parts.extend(task.projects.iter().map(|p| format!("+{p}")));
    parts.extend(task.contexts.iter().map(|c| format!("@{c}")));
    if let Some(due) = task.due {
        parts.push(format!("due:{}", format_date(due)));
    }
    if let Some(rec) = task.recurrence {
        parts.push(format!("rec:{rec}"));
    }

    parts.join(" ")
}

/// The first word of `task.text` when [`parse_line`] would take it for a
/// completion, priority or creation marker after [`serialize`].
///
/// Text that follows a creation date is never re-read, so only tasks
/// without one can be affected.
pub(crate) fn marker_at_head(task: &Task) -> Option<&str> {
    if task.creation_date.is_some() {
        return None;
    }
    let (token, rest) = split_first_token(&task.text);
    let as_completion = !task.complete
        && task.priority.is_none()
        && token == "x"
        && strip_leading_date(rest).is_some();
    let as_priority = task.priority.is_none() && strip_priority(&task.text).is_some();
    let as_creation = strip_leading_date(&task.text).is_some();
    (as_completion || as_priority || as_creation).then_some(token)
}

pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Split off a leading `YYYY-MM-DD` token.
fn strip_leading_date(s: &str) -> Option<(NaiveDate, &str)> {
    let (token, rest) = split_first_token(s);
    if !is_valid_due_date(token) {
        return None;
    }
    parse_date(token).map(|d| (d, rest))
}

/// Split off a leading `(X)` token.
fn strip_priority(s: &str) -> Option<(Priority, &str)> {
    let (token, rest) = split_first_token(s);
    let letter = token.strip_prefix('(')?.strip_suffix(')')?;
    letter.parse().ok().map(|p| (p, rest))
}

fn split_first_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (s, ""),
    }
}
