//! Recurrence rules such as `rec:2w`.
//!
//! A rule is an amount between 1 and 7 and a calendar unit. It is written
//! as `<amount><unit-code>` and advances a due date when a recurring task
//! is completed.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::validation::recurrence_regex;

/// Calendar granularity of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
}

impl RecurrenceUnit {
    /// Single-letter code used in the `rec:` tag.
    pub fn code(self) -> char {
        match self {
            RecurrenceUnit::Day => 'd',
            RecurrenceUnit::Week => 'w',
            RecurrenceUnit::Month => 'm',
        }
    }

    /// Singular unit name used in human-readable output.
    pub fn name(self) -> &'static str {
        match self {
            RecurrenceUnit::Day => "day",
            RecurrenceUnit::Week => "week",
            RecurrenceUnit::Month => "month",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "d" => Some(RecurrenceUnit::Day),
            "w" => Some(RecurrenceUnit::Week),
            "m" => Some(RecurrenceUnit::Month),
            _ => None,
        }
    }
}

/// An immutable recurrence rule. Construct it by parsing, e.g. `"3w".parse()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Recurrence {
    amount: u8,
    unit: RecurrenceUnit,
}

impl Recurrence {
    pub fn amount(&self) -> u8 {
        self.amount
    }

    pub fn unit(&self) -> RecurrenceUnit {
        self.unit
    }

    /// Advance `date` by this rule.
    ///
    /// Months are added with chrono's calendar arithmetic, which clamps to
    /// the last day of a shorter month: `2024-01-31 + 1m` is `2024-02-29`.
    /// A result past chrono's representable range leaves `date` unchanged.
    pub fn add_to(&self, date: NaiveDate) -> NaiveDate {
        let amount = u64::from(self.amount);
        let next = match self.unit {
            RecurrenceUnit::Day => date.checked_add_days(Days::new(amount)),
            RecurrenceUnit::Week => date.checked_add_days(Days::new(amount * 7)),
            RecurrenceUnit::Month => date.checked_add_months(Months::new(u32::from(self.amount))),
        };
        next.unwrap_or(date)
    }

    /// Human-readable form: `every day`, `every 3 week`.
    ///
    /// The unit name stays singular whatever the amount.
    pub fn display(&self) -> String {
        if self.amount > 1 {
            format!("every {} {}", self.amount, self.unit.name())
        } else {
            format!("every {}", self.unit.name())
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.code())
    }
}

impl FromStr for Recurrence {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TaskError::InvalidRecurrence(s.to_string());
        let caps = recurrence_regex().captures(s).ok_or_else(invalid)?;
        let amount = caps[1].parse::<u8>().map_err(|_| invalid())?;
        let unit = RecurrenceUnit::from_code(&caps[2]).ok_or_else(invalid)?;
        Ok(Recurrence { amount, unit })
    }
}

impl TryFrom<String> for Recurrence {
    type Error = TaskError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Recurrence> for String {
    fn from(r: Recurrence) -> Self {
        r.to_string()
    }
}
