//! Task data structure and related functionality.
//!
//! A [`Task`] is the structured form of one todo.txt line. Front ends read it
//! through the derived queries here and edit it by handing back a
//! [`TaskData`] record of plain strings.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::codec::{self, push_unique};
use crate::error::{Result, TaskError};
use crate::fields::Priority;
use crate::recurrence::Recurrence;
use crate::validation::{
    format_date, validate_due_date, validate_priority, validate_project, validate_recurrence,
};

/// One task line, parsed.
///
/// `completed_date` is set exactly when `complete` is true. A `recurrence`
/// without a `due` date is kept but never acted on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    /// Description with every recognised tag removed.
    pub text: String,
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    pub priority: Option<Priority>,
    /// Set by [`Task::create`] and never changed afterwards.
    pub creation_date: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    pub recurrence: Option<Recurrence>,
    pub complete: bool,
    pub completed_date: Option<NaiveDate>,
}

/// Editable fields as plain strings. An empty string means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskData {
    pub text: String,
    pub project: String,
    pub priority: String,
    pub due_date: String,
    pub recurrence: String,
}

impl Task {
    /// Build a new task from form input, stamped with `today` as its creation date.
    pub fn create(data: &TaskData, today: NaiveDate) -> Result<Self> {
        let mut task = Task {
            creation_date: Some(today),
            ..Task::default()
        };
        task.update(data)?;
        Ok(task)
    }

    /// Overwrite the editable fields from `data`. Empty fields are cleared.
    ///
    /// Every field is validated before anything is written, so on error the
    /// task is left as it was. On a task without a creation date, text may
    /// not start with a word the line parser would take for a marker
    /// (`x 2024-01-01`, `(A)`, a date). Tags typed into `data.text` are honoured:
    /// `+project` and `@context` tokens are added, and a `due:` or `rec:` tag
    /// is used when the matching field is empty.
    pub fn update(&mut self, data: &TaskData) -> Result<()> {
        let project = validate_project(&data.project)?;
        let priority = validate_priority(&data.priority)?;
        let due = validate_due_date(&data.due_date)?;
        let recurrence = validate_recurrence(&data.recurrence)?;
        let body = codec::parse_body(&data.text);

        let mut projects: Vec<String> = project.into_iter().collect();
        for p in &body.projects {
            push_unique(&mut projects, p);
        }

        let next = Task {
            text: body.text,
            projects,
            contexts: body.contexts,
            priority,
            due: due.or(body.due),
            recurrence: recurrence.or(body.recurrence),
            ..self.clone()
        };
        if let Some(token) = codec::marker_at_head(&next) {
            return Err(TaskError::InvalidText(token.to_string()));
        }
        *self = next;
        Ok(())
    }

    /// Snapshot the editable fields.
    ///
    /// `TaskData` has a single project slot and no context slot, so extra
    /// projects and all contexts are written back into `text` as tags. That
    /// makes `task.update(&task.to_task_data())` a no-op.
    pub fn to_task_data(&self) -> TaskData {
        let mut words: Vec<String> = Vec::new();
        if !self.text.is_empty() {
            words.push(self.text.clone());
        }
        words.extend(self.projects.iter().skip(1).map(|p| format!("+{p}")));
        words.extend(self.contexts.iter().map(|c| format!("@{c}")));

        TaskData {
            text: words.join(" "),
            project: self.projects.first().cloned().unwrap_or_default(),
            priority: self.priority.map(|p| p.to_string()).unwrap_or_default(),
            due_date: self.due.map(format_date).unwrap_or_default(),
            recurrence: self.recurrence.map(|r| r.to_string()).unwrap_or_default(),
        }
    }

    /// Flip completion. Completing stamps `today`; reopening clears the stamp.
    pub fn toggle_complete(&mut self, today: NaiveDate) {
        if self.complete {
            self.complete = false;
            self.completed_date = None;
        } else {
            self.complete = true;
            self.completed_date = Some(today);
        }
    }

    /// True if the task was due before `today`. A task due today is not overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due.is_some_and(|due| due < today)
    }

    /// Move the due date one day later.
    ///
    /// Returns `false` and changes nothing when there is no due date.
    pub fn postpone(&mut self) -> bool {
        let Some(due) = self.due else {
            return false;
        };
        match due.checked_add_days(Days::new(1)) {
            Some(next) => {
                self.due = Some(next);
                true
            }
            None => false,
        }
    }

    /// The next occurrence of a recurring task.
    ///
    /// Returns a copy whose due date is advanced by the recurrence rule, or
    /// `None` unless both `due` and `recurrence` are set. `self` is not modified.
    pub fn recur(&self) -> Option<Task> {
        let due = self.due?;
        let rule = self.recurrence?;
        let mut next = self.duplicate();
        next.due = Some(rule.add_to(due));
        Some(next)
    }

    /// An independent copy made by serializing and re-parsing the line.
    pub fn duplicate(&self) -> Task {
        codec::parse_line(&codec::serialize(self))
    }

    /// Canonical todo.txt line for this task.
    pub fn to_line(&self) -> String {
        codec::serialize(self)
    }

    /// `every day`, `every 3 week`, or `None` without a rule.
    pub fn recurrence_display(&self) -> Option<String> {
        self.recurrence.map(|r| r.display())
    }

    /// Due date relative to `today`: "today", "tomorrow", "in 3d", "2d late", or "-".
    pub fn due_display(&self, today: NaiveDate) -> String {
        match self.due {
            None => "-".into(),
            Some(d) => {
                let days = (d - today).num_days();
                match days {
                    0 => "today".into(),
                    1 => "tomorrow".into(),
                    n if n > 1 => format!("in {n}d"),
                    n => format!("{}d late", -n),
                }
            }
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::serialize(self))
    }
}

impl FromStr for Task {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(codec::parse_line(s))
    }
}
