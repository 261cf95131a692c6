use chrono::NaiveDate;
use clap::Parser;

use crate::cmd::Commands;

/// todo.txt line filter.
/// Reads task lines on stdin and writes results to stdout; it never touches files.
#[derive(Parser)]
#[command(name = "todo", version, about = "todo.txt parser, editor and recurrence tool")]
pub struct Cli {
    /// Date to treat as today (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true, env = "TODO_TODAY", value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Emit JSON task records instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_today(s: &str) -> Result<NaiveDate, String> {
    todo_txt::validation::parse_date(s).ok_or_else(|| format!("'{s}' is not a YYYY-MM-DD date"))
}
