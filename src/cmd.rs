//! Command implementations for the CLI interface.
//!
//! Every command except `add` and `completions` works on the task list read
//! from stdin. Commands that change a task print the whole list back out in
//! canonical form, so the tool can sit in a pipe:
//!
//! ```bash
//! todo done 3 < todo.txt > todo.new && mv todo.new todo.txt
//! ```

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::info;

use todo_txt::{DueFilter, SortKey, Task, TaskData, TaskId, TaskList};

use crate::cli::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the line for a new task.
    Add {
        /// Task description. May contain +project, @context, due: and rec: tags.
        text: String,
        /// Project name.
        #[arg(long)]
        project: Option<String>,
        /// Priority letter A-Z.
        #[arg(long)]
        priority: Option<String>,
        /// Due date: YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        /// Recurrence: 1-7 followed by d, w or m (e.g. 2w).
        #[arg(long)]
        rec: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Filter by project.
        #[arg(long)]
        project: Option<String>,
        /// Filter by context.
        #[arg(long)]
        context: Option<String>,
        /// Due filter: today | overdue | none.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a single task by ID.
    Show {
        /// Task ID (1-based line number of the input).
        id: u64,
    },

    /// Rewrite every line in canonical form.
    Normalize,

    /// Toggle completion. Completing a recurring task appends its next occurrence.
    Done {
        /// Task ID (1-based line number of the input).
        id: u64,
    },

    /// Move a task's due date one day later.
    Postpone {
        /// Task ID (1-based line number of the input).
        id: u64,
    },

    /// Update fields on a task. Pass an empty string to clear a field.
    Edit {
        /// Task ID (1-based line number of the input).
        id: u64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        rec: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// JSON view of one task. `id` is left out for a task that is not in a list yet.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<TaskId>,
    line: String,
    complete: bool,
    overdue: bool,
    #[serde(flatten)]
    data: TaskData,
}

impl TaskRecord {
    fn new(id: Option<TaskId>, task: &Task, today: NaiveDate) -> Self {
        TaskRecord {
            id,
            line: task.to_line(),
            complete: task.complete,
            overdue: task.is_overdue(today),
            data: task.to_task_data(),
        }
    }
}

/// Create a task and print its line.
pub fn cmd_add(
    today: NaiveDate,
    json: bool,
    text: String,
    project: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    rec: Option<String>,
) -> Result<()> {
    let data = TaskData {
        text,
        project: project.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        due_date: due.unwrap_or_default(),
        recurrence: rec.unwrap_or_default(),
    };
    let task = Task::create(&data, today).context("cannot create task")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&TaskRecord::new(None, &task, today))?);
    } else {
        println!("{task}");
    }
    Ok(())
}

/// List tasks with optional filtering and sorting.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    list: &TaskList,
    today: NaiveDate,
    json: bool,
    all: bool,
    project: Option<String>,
    context: Option<String>,
    due: Option<DueFilter>,
    sort: SortKey,
    limit: Option<usize>,
) -> Result<()> {
    let mut filtered: Vec<(TaskId, &Task)> = list
        .iter()
        .filter(|(_, t)| {
            if !all && t.complete {
                return false;
            }
            if let Some(ref p) = project {
                if !t.projects.contains(p) {
                    return false;
                }
            }
            if let Some(ref c) = context {
                if !t.contexts.contains(c) {
                    return false;
                }
            }
            match due {
                Some(DueFilter::Today) => t.due == Some(today),
                Some(DueFilter::Overdue) => t.is_overdue(today),
                Some(DueFilter::None) => t.due.is_none(),
                None => true,
            }
        })
        .collect();

    match sort {
        SortKey::Due => filtered.sort_by_key(|(id, t)| (t.due.unwrap_or(NaiveDate::MAX), *id)),
        SortKey::Priority => {
            filtered.sort_by_key(|(id, t)| (t.priority.is_none(), t.priority, *id))
        }
        SortKey::Id => filtered.sort_by_key(|(id, _)| *id),
    }

    if let Some(n) = limit {
        filtered.truncate(n);
    }

    if json {
        let records: Vec<TaskRecord> = filtered
            .iter()
            .map(|(id, t)| TaskRecord::new(Some(*id), t, today))
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_table(&filtered, today);
    }
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_show(list: &TaskList, id: u64, today: NaiveDate, json: bool) -> Result<()> {
    let id = TaskId(id);
    let task = list.get(id).with_context(|| format!("task {id} not found"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&TaskRecord::new(Some(id), task, today))?);
        return Ok(());
    }
    let date_or_dash = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(dash);
    let priority = task.priority.map(|p| p.to_string()).unwrap_or_else(dash);
    println!("ID:           {id}");
    println!("Text:         {}", if task.text.is_empty() { "-" } else { task.text.as_str() });
    println!("Priority:     {priority}");
    println!("Projects:     {}", join_or_dash(&task.projects));
    println!("Contexts:     {}", join_or_dash(&task.contexts));
    println!("Created:      {}", date_or_dash(task.creation_date));
    println!(
        "Due:          {}",
        match task.due {
            Some(d) => format!("{d} ({})", task.due_display(today)),
            None => "-".into(),
        }
    );
    println!("Repeats:      {}", task.recurrence_display().unwrap_or_else(dash));
    println!("Complete:     {}", if task.complete { "yes" } else { "no" });
    println!("Completed:    {}", date_or_dash(task.completed_date));
    println!("Line:         {task}");
    Ok(())
}

/// Print every task in canonical form.
pub fn cmd_normalize(list: &TaskList) {
    print!("{}", list.to_text());
}

/// Toggle completion of a task and print the resulting list.
pub fn cmd_done(list: &mut TaskList, id: u64, today: NaiveDate) -> Result<()> {
    let id = TaskId(id);
    if let Some(next) = list.toggle_complete(id, today)? {
        info!(%id, %next, "recurring task rescheduled");
    }
    print!("{}", list.to_text());
    Ok(())
}

/// Postpone a task by one day and print the resulting list.
pub fn cmd_postpone(list: &mut TaskList, id: u64) -> Result<()> {
    let id = TaskId(id);
    if !list.postpone(id)? {
        bail!("task {id} has no due date to postpone");
    }
    print!("{}", list.to_text());
    Ok(())
}

/// Update an existing task's fields and print the resulting list.
///
/// Options left out keep their current value.
pub fn cmd_edit(
    list: &mut TaskList,
    id: u64,
    text: Option<String>,
    project: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    rec: Option<String>,
) -> Result<()> {
    let id = TaskId(id);
    let current = list.get(id).with_context(|| format!("task {id} not found"))?;
    let mut data = current.to_task_data();
    if let Some(t) = text {
        data.text = t;
    }
    if let Some(p) = project {
        data.project = p;
    }
    if let Some(p) = priority {
        data.priority = p;
    }
    if let Some(d) = due {
        data.due_date = d;
    }
    if let Some(r) = rec {
        data.recurrence = r;
    }

    list.update(id, &data).with_context(|| format!("cannot update task {id}"))?;
    print!("{}", list.to_text());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[(TaskId, &Task)], today: NaiveDate) {
    println!(
        "{:<4} {:<3} {:<10} {:<14} {:<14} {}",
        "ID", "Pri", "Due", "Project", "Repeats", "Text [contexts]"
    );
    for (id, t) in tasks {
        let contexts = if t.contexts.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.contexts.join(","))
        };
        let marker = if t.complete { "x " } else { "" };
        println!(
            "{:<4} {:<3} {:<10} {:<14} {:<14} {}{}{}",
            id.0,
            t.priority.map(|p| p.to_string()).unwrap_or_else(dash),
            t.due_display(today),
            truncate(&join_or_dash(&t.projects), 14),
            t.recurrence_display().unwrap_or_else(dash),
            marker,
            t.text,
            contexts
        );
    }
}

fn dash() -> String {
    "-".into()
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".into()
    } else {
        items.join(",")
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 14), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }

    #[test]
    fn test_task_record_flattens_data() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let task: Task = "(A) Ship +release due:2024-06-01".parse().unwrap();
        let json = serde_json::to_value(TaskRecord::new(Some(TaskId(7)), &task, today)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["overdue"], true);
        assert_eq!(json["project"], "release");
        assert_eq!(json["dueDate"], "2024-06-01");
        assert_eq!(json["line"], "(A) Ship +release due:2024-06-01");
    }

    #[test]
    fn test_task_record_without_id() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let task: Task = "Draft".parse().unwrap();
        let json = serde_json::to_value(TaskRecord::new(None, &task, today)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["text"], "Draft");
    }
}
