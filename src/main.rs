//! # todo - todo.txt line filter
//!
//! Reads todo.txt lines on stdin, applies one operation, and writes the result
//! to stdout. Files are never opened directly, so redirect in and out:
//!
//! ```bash
//! # Create a line and append it
//! todo add "Pay rent" --project home --due 2024-02-01 --rec 1m >> todo.txt
//!
//! # Overdue work, most urgent first
//! todo list --due overdue --sort priority < todo.txt
//!
//! # Complete task 3; a recurring task gets its next occurrence appended
//! todo done 3 < todo.txt > todo.new && mv todo.new todo.txt
//! ```
//!
//! Set `TODO_TODAY=YYYY-MM-DD` (or `--today`) to pin the date, and `TODO_LOG`
//! (e.g. `TODO_LOG=debug`) to see parser and list diagnostics on stderr.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_txt::TaskList;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn main() {
    let cli = Cli::parse();
    install_tracing();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let json = cli.json;

    match cli.command {
        Commands::Add {
            text,
            project,
            priority,
            due,
            rec,
        } => cmd_add(today, json, text, project, priority, due, rec),

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }

        Commands::List {
            all,
            project,
            context,
            due,
            sort,
            limit,
        } => cmd_list(
            &read_stdin_list()?,
            today,
            json,
            all,
            project,
            context,
            due,
            sort,
            limit,
        ),

        Commands::Show { id } => cmd_show(&read_stdin_list()?, id, today, json),

        Commands::Normalize => {
            cmd_normalize(&read_stdin_list()?);
            Ok(())
        }

        Commands::Done { id } => cmd_done(&mut read_stdin_list()?, id, today),

        Commands::Postpone { id } => cmd_postpone(&mut read_stdin_list()?, id),

        Commands::Edit {
            id,
            text,
            project,
            priority,
            due,
            rec,
        } => cmd_edit(&mut read_stdin_list()?, id, text, project, priority, due, rec),
    }
}

/// Every command except `add` and `completions` reads the task list from stdin.
fn read_stdin_list() -> Result<TaskList> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read tasks from stdin")?;
    Ok(TaskList::from_text(&buf))
}

fn install_tracing() {
    let filter = EnvFilter::try_from_env("TODO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "todo",
            "--today",
            "2024-01-15",
            "add",
            "Pay rent",
            "--project",
            "home",
            "--rec",
            "1m",
        ]);
        assert_eq!(cli.today, chrono::NaiveDate::from_ymd_opt(2024, 1, 15));
        match cli.command {
            Commands::Add {
                text,
                project,
                rec,
                priority,
                ..
            } => {
                assert_eq!(text, "Pay rent");
                assert_eq!(project.as_deref(), Some("home"));
                assert_eq!(rec.as_deref(), Some("1m"));
                assert_eq!(priority, None);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_list_command_defaults() {
        let cli = Cli::parse_from(["todo", "list", "--due", "overdue"]);
        match cli.command {
            Commands::List { all, due, sort, .. } => {
                assert!(!all);
                assert!(matches!(due, Some(todo_txt::DueFilter::Overdue)));
                assert!(matches!(sort, todo_txt::SortKey::Due));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn rejects_malformed_today() {
        assert!(Cli::try_parse_from(["todo", "--today", "tomorrow", "normalize"]).is_err());
    }
}
