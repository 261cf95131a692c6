//! Field validation patterns shared by form-level checks and the core.
//!
//! Front ends are expected to run these before building a
//! [`TaskData`](crate::task::TaskData), but [`Task::create`](crate::task::Task::create)
//! and [`Task::update`](crate::task::Task::update) apply them again so that a
//! bad value can never reach a serialized line.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Result, TaskError};
use crate::fields::Priority;
use crate::recurrence::Recurrence;

/// Project or context token: no whitespace, no `+`.
pub const TOKEN_PATTERN: &str = r"^[^+\s]+$";
/// Single uppercase letter.
pub const PRIORITY_PATTERN: &str = r"^[A-Z]$";
/// ISO calendar date with month 01-12 and day 01-31.
pub const DUE_DATE_PATTERN: &str = r"^\d{4}-(0\d|1[0-2])-([0-2]\d|3[01])$";
/// Recurrence amount 1-7 followed by a unit code.
pub const RECURRENCE_PATTERN: &str = r"^([1-7])(d|w|m)$";

/// Date format used everywhere a date appears in a line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
static PRIORITY_RE: OnceLock<Regex> = OnceLock::new();
static DUE_DATE_RE: OnceLock<Regex> = OnceLock::new();
static RECURRENCE_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("validation pattern compiles"))
}

pub(crate) fn recurrence_regex() -> &'static Regex {
    compiled(&RECURRENCE_RE, RECURRENCE_PATTERN)
}

/// True if `s` is usable as a `+project` or `@context` value.
pub fn is_valid_token(s: &str) -> bool {
    compiled(&TOKEN_RE, TOKEN_PATTERN).is_match(s)
}

/// True if `s` is a single uppercase letter.
pub fn is_valid_priority(s: &str) -> bool {
    compiled(&PRIORITY_RE, PRIORITY_PATTERN).is_match(s)
}

/// True if `s` has the shape of a due date. Does not check that the day exists in that month.
pub fn is_valid_due_date(s: &str) -> bool {
    compiled(&DUE_DATE_RE, DUE_DATE_PATTERN).is_match(s)
}

/// True if `s` is a recurrence rule such as `3w`.
pub fn is_valid_recurrence(s: &str) -> bool {
    recurrence_regex().is_match(s)
}

/// Parse a `YYYY-MM-DD` date, returning `None` for anything chrono rejects.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Render a date in line format.
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Validate an optional project string. Empty means unset.
pub fn validate_project(s: &str) -> Result<Option<String>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if !is_valid_token(s) {
        return Err(TaskError::InvalidProject(s.to_string()));
    }
    Ok(Some(s.to_string()))
}

/// Validate an optional context string. Empty means unset.
pub fn validate_context(s: &str) -> Result<Option<String>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if !is_valid_token(s) {
        return Err(TaskError::InvalidContext(s.to_string()));
    }
    Ok(Some(s.to_string()))
}

/// Validate an optional priority string. Empty means unset.
pub fn validate_priority(s: &str) -> Result<Option<Priority>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if !is_valid_priority(s) {
        return Err(TaskError::InvalidPriority(s.to_string()));
    }
    s.parse().map(Some)
}

/// Validate an optional due date string. Empty means unset.
///
/// The string must match the pattern and also name a day that exists,
/// so `2024-02-30` is rejected here even though it passes the pattern.
pub fn validate_due_date(s: &str) -> Result<Option<NaiveDate>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if !is_valid_due_date(s) {
        return Err(TaskError::InvalidDueDate(s.to_string()));
    }
    parse_date(s)
        .map(Some)
        .ok_or_else(|| TaskError::InvalidDueDate(s.to_string()))
}

/// Validate an optional recurrence string. Empty means unset.
pub fn validate_recurrence(s: &str) -> Result<Option<Recurrence>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse().map(Some)
}
