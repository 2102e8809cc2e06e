//! Line-oriented session over one `TaskStore`.

use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};
use tally_core::{Clock, NewTask, Priority, TaskPatch, TaskStatus, TaskStore};

use crate::view::{Filter, render_metrics, render_row};

const HELP: &str = "\
Commands:
  list [TEXT]                          show tasks (optionally matching TEXT)
  metrics                              show aggregate metrics
  add REVENUE HOURS PRIORITY TITLE...  add a task
  done ID                              mark a task Done
  status ID STATUS                     set status (todo, in-progress, done)
  edit ID FIELD VALUE...               FIELD: title, revenue, hours, priority, notes
  delete ID                            delete a task (undoable)
  undo                                 restore the last deleted task
  help                                 this text
  quit                                 leave";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List(Option<String>),
    Metrics,
    Add(NewTask),
    Update(String, TaskPatch),
    Delete(String),
    Undo,
    Help,
    Quit,
}

fn parse_number(s: &str, what: &str) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(n) => Ok(n),
        Err(_) => bail!("{what} must be a number, got '{s}'"),
    }
}

fn parse_priority(s: &str) -> Result<Priority> {
    match Priority::parse(s) {
        Some(p) => Ok(p),
        None => bail!("unknown priority '{s}' (low, medium, high)"),
    }
}

fn parse_status(s: &str) -> Result<TaskStatus> {
    match TaskStatus::parse(s) {
        Some(st) => Ok(st),
        None => bail!("unknown status '{s}' (todo, in-progress, done)"),
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, args)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match (cmd.to_ascii_lowercase().as_str(), args) {
        ("list" | "ls", []) => ShellCommand::List(None),
        ("list" | "ls", rest) => ShellCommand::List(Some(rest.join(" "))),
        ("metrics", []) => ShellCommand::Metrics,
        ("add", [revenue, hours, priority, title @ ..]) => ShellCommand::Add(
            NewTask::new(title.join(" "))
                .with_revenue(parse_number(revenue, "revenue")?)
                .with_time_taken(parse_number(hours, "hours")?)
                .with_priority(parse_priority(priority)?),
        ),
        ("done", [id]) => ShellCommand::Update(id.to_string(), TaskPatch::status(TaskStatus::Done)),
        ("status", [id, status @ ..]) if !status.is_empty() => ShellCommand::Update(
            id.to_string(),
            TaskPatch::status(parse_status(&status.join(" "))?),
        ),
        ("edit", [id, field, value @ ..]) if !value.is_empty() => {
            let value = value.join(" ");
            let mut patch = TaskPatch::default();
            match field.to_ascii_lowercase().as_str() {
                "title" => patch.title = Some(value),
                "revenue" => patch.revenue = Some(parse_number(&value, "revenue")?),
                "hours" | "time" => patch.time_taken = Some(parse_number(&value, "hours")?),
                "priority" => patch.priority = Some(parse_priority(&value)?),
                "notes" => patch.notes = Some(value),
                other => bail!("unknown field '{other}'"),
            }
            ShellCommand::Update(id.to_string(), patch)
        }
        ("delete" | "rm", [id]) => ShellCommand::Delete(id.to_string()),
        ("undo", []) => ShellCommand::Undo,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        (other, _) => bail!("cannot parse '{other}' here; try: help"),
    };
    Ok(Some(cmd))
}

/// Expand a unique id prefix to the full id. Exact matches win.
fn resolve_id<C: Clock>(store: &TaskStore<C>, prefix: &str) -> Option<String> {
    if store.get(prefix).is_some() {
        return Some(prefix.to_string());
    }
    let mut hits = store.tasks().iter().filter(|t| t.id.starts_with(prefix));
    match (hits.next(), hits.next()) {
        (Some(t), None) => Some(t.id.clone()),
        _ => None,
    }
}

/// Run one command against the store and return what to print.
pub fn apply<C: Clock>(store: &mut TaskStore<C>, cmd: ShellCommand) -> String {
    match cmd {
        ShellCommand::List(search) => {
            let filter = Filter {
                search,
                ..Filter::default()
            };
            let rows = filter.apply(store.derived_sorted());
            if rows.is_empty() {
                return "(no tasks)".to_string();
            }
            rows.into_iter().map(render_row).collect::<Vec<_>>().join("\n")
        }
        ShellCommand::Metrics => render_metrics(store.metrics()).trim_end().to_string(),
        ShellCommand::Add(new) => format!("added {}", store.add(new)),
        ShellCommand::Update(prefix, patch) => {
            let Some(id) = resolve_id(store, &prefix) else {
                return format!("no task matching '{prefix}'");
            };
            if store.update(&id, patch) {
                format!("updated {id}")
            } else {
                format!("no task matching '{prefix}'")
            }
        }
        ShellCommand::Delete(prefix) => {
            let removed = resolve_id(store, &prefix).and_then(|id| store.delete(&id));
            match removed {
                Some(t) => format!("deleted {} ({}); 'undo' restores it", t.id, t.title),
                None => format!("no task matching '{prefix}'"),
            }
        }
        ShellCommand::Undo => match store.undo_delete() {
            Some(id) => format!("restored {id}"),
            None => "nothing to undo".to_string(),
        },
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    }
}

pub fn run_shell<C: Clock>(store: &mut TaskStore<C>) -> Result<()> {
    println!("tally shell ({} tasks). Type 'help' for commands.", store.tasks().len());
    let stdin = io::stdin();
    loop {
        print!("tally> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(cmd)) => println!("{}", apply(store, cmd)),
            Err(e) => println!("error: {e}"),
        }
    }
    Ok(())
}
