//! Error types for task construction and editing.
//!
//! Parsing a raw line never fails: malformed tags degrade to plain text.
//! Errors only surface when a caller hands the core a field value that
//! violates one of the validation patterns, or references a task that does
//! not exist in a [`TaskList`](crate::list::TaskList).

use crate::list::TaskId;

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

/// Errors raised when a field value is rejected or a task cannot be found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Project name contains whitespace or `+`, or is empty.
    #[error("invalid project '{0}': must be one or more characters without spaces or '+'")]
    InvalidProject(String),

    /// Context name contains whitespace or `+`, or is empty.
    #[error("invalid context '{0}': must be one or more characters without spaces or '+'")]
    InvalidContext(String),

    /// Priority is not a single uppercase letter.
    #[error("invalid priority '{0}': expected a single letter A-Z")]
    InvalidPriority(String),

    /// Due date is not a real calendar date in `YYYY-MM-DD` form.
    #[error("invalid due date '{0}': expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// Recurrence does not match `<1-7><d|w|m>`.
    #[error("invalid recurrence '{0}': expected an amount 1-7 followed by d, w or m")]
    InvalidRecurrence(String),

    /// Text would be read back as a completion, priority or creation marker.
    #[error("invalid text: leading '{0}' reads as a marker on a task without a creation date")]
    InvalidText(String),

    /// No task with this id in the list.
    #[error("task {0} not found")]
    UnknownTask(TaskId),
}
