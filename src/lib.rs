//! # todo_txt - todo.txt lines as structured tasks
//!
//! Parse plain-text task lines in the todo.txt format, edit them through a
//! small set of operations, and write them back out in canonical form.
//!
//! ```text
//! x 2024-03-02 (B) 2024-03-01 Renew passport +admin @town due:2024-03-05 rec:1m
//! │ │            │   │          │               │      │     │              └ recurrence
//! │ │            │   │          │               │      │     └ due date
//! │ │            │   │          │               │      └ context
//! │ │            │   │          │               └ project
//! │ │            │   │          └ text
//! │ │            │   └ creation date
//! │ │            └ priority
//! │ └ completion date
//! └ completion marker
//! ```
//!
//! ## Key Features
//!
//! - **Lossless round trip**: `parse_line(&serialize(&t)) == t` for every valid task
//! - **Lenient parsing**: malformed tags such as `due:2024-13-40` stay in the text
//! - **Strict editing**: [`Task::create`] and [`Task::update`] reject bad field values
//! - **Recurrence**: `rec:<1-7><d|w|m>` rules with calendar-aware month arithmetic
//! - **Pluggable tags**: `key:value` extractors live in an explicit [`ExtensionRegistry`]
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use todo_txt::{parse_line, Task};
//!
//! let task = parse_line("(A) Pay rent +home due:2024-01-31 rec:1m");
//! let next: Task = task.recur().unwrap();
//! assert_eq!(next.due, NaiveDate::from_ymd_opt(2024, 2, 29));
//! assert_eq!(next.to_line(), "(A) Pay rent +home due:2024-02-29 rec:1m");
//! ```
//!
//! All operations are synchronous and only touch the task they are called on.
//! Anything that depends on the clock takes today's date as an argument.

pub mod codec;
pub mod error;
pub mod extension;
pub mod fields;
pub mod list;
pub mod recurrence;
pub mod task;
pub mod validation;

pub use codec::{parse_body, parse_line, parse_line_with, serialize, Body};
pub use error::{Result, TaskError};
pub use extension::{
    DueExtension, Extracted, Extraction, ExtensionRegistry, Extractor, RecurrenceExtension,
    TagValue,
};
pub use fields::{DueFilter, Priority, SortKey};
pub use list::{TaskId, TaskList};
pub use recurrence::{Recurrence, RecurrenceUnit};
pub use task::{Task, TaskData};
