//! In-memory task list with stable identifiers.
//!
//! Ids are handed out in increasing order and never reused, so a task keeps
//! its id when others are added or removed around it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::error::{Result, TaskError};
use crate::task::{Task, TaskData};

/// Identifier of a task inside a [`TaskList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered tasks, each under a [`TaskId`].
#[derive(Debug, Default, Clone)]
pub struct TaskList {
    entries: Vec<(TaskId, Task)>,
    last_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList::default()
    }

    /// Parse todo.txt content, one task per non-blank line. Ids start at 1.
    pub fn from_text(content: &str) -> Self {
        let mut list = TaskList::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            list.push(codec::parse_line(line));
        }
        debug!(tasks = list.len(), "loaded task list");
        list
    }

    /// Serialize every task, one canonical line each, in list order.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (_, task) in &self.entries {
            out.push_str(&codec::serialize(task));
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.entries.iter().map(|(id, t)| (*id, t))
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.entries.iter_mut().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    fn require_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.get_mut(id).ok_or(TaskError::UnknownTask(id))
    }

    /// Append a task and return its new id.
    pub fn push(&mut self, task: Task) -> TaskId {
        self.last_id += 1;
        let id = TaskId(self.last_id);
        self.entries.push((id, task));
        id
    }

    /// Create a task from form input and append it.
    pub fn create(&mut self, data: &TaskData, today: NaiveDate) -> Result<TaskId> {
        let task = Task::create(data, today)?;
        let id = self.push(task);
        debug!(%id, "created task");
        Ok(id)
    }

    /// Apply form input to an existing task.
    pub fn update(&mut self, id: TaskId, data: &TaskData) -> Result<()> {
        self.require_mut(id)?.update(data)?;
        debug!(%id, "updated task");
        Ok(())
    }

    /// Remove a task, returning it.
    pub fn remove(&mut self, id: TaskId) -> Result<Task> {
        let idx = self
            .entries
            .iter()
            .position(|(i, _)| *i == id)
            .ok_or(TaskError::UnknownTask(id))?;
        debug!(%id, "removed task");
        Ok(self.entries.remove(idx).1)
    }

    /// Toggle completion of a task.
    ///
    /// When this completes a recurring task, its next occurrence is appended
    /// (still open) and the new id is returned.
    pub fn toggle_complete(&mut self, id: TaskId, today: NaiveDate) -> Result<Option<TaskId>> {
        let task = self.require_mut(id)?;
        let next = if task.complete { None } else { task.recur() };
        task.toggle_complete(today);
        debug!(%id, complete = task.complete, "toggled completion");

        Ok(next.map(|next| {
            let due = next.due;
            let next_id = self.push(next);
            debug!(%id, %next_id, ?due, "queued next occurrence");
            next_id
        }))
    }

    /// Move a task's due date one day later. `Ok(false)` if it has no due date.
    pub fn postpone(&mut self, id: TaskId) -> Result<bool> {
        let moved = self.require_mut(id)?.postpone();
        debug!(%id, moved, "postponed task");
        Ok(moved)
    }
}
