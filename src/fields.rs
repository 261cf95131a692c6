//! Enumerations and small field types for todo.txt tasks.
//!
//! This module defines the priority letter carried by a task line, plus the
//! sort and due-date filter choices offered by the command line.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Task priority, a single uppercase letter where `A` is the most important.
///
/// Ordering follows the alphabet, so sorting ascending puts `A` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Priority(char);

impl Priority {
    /// Build a priority from a letter, rejecting anything outside `A..=Z`.
    pub fn new(letter: char) -> Result<Self, TaskError> {
        if letter.is_ascii_uppercase() {
            Ok(Priority(letter))
        } else {
            Err(TaskError::InvalidPriority(letter.to_string()))
        }
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Priority::new(c),
            _ => Err(TaskError::InvalidPriority(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = TaskError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.to_string()
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Due,
    Priority,
    Id,
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    Overdue,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_accepts_uppercase_letters() {
        assert_eq!(Priority::new('A').unwrap().letter(), 'A');
        assert_eq!("Z".parse::<Priority>().unwrap().to_string(), "Z");
    }

    #[test]
    fn test_priority_rejects_other_input() {
        assert!(Priority::new('a').is_err());
        assert!(Priority::new('1').is_err());
        assert!("".parse::<Priority>().is_err());
        assert!("AB".parse::<Priority>().is_err());
        assert!("É".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_orders_a_first() {
        let mut ps: Vec<Priority> = ["C", "A", "B"].iter().map(|s| s.parse().unwrap()).collect();
        ps.sort();
        let letters: String = ps.iter().map(|p| p.letter()).collect();
        assert_eq!(letters, "ABC");
    }
}
