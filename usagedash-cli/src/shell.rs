use std::io::{self, Write};
use std::path::PathBuf;

use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use usagedash_engine::{SearchSession, SearchSnapshot};
use usagedash_protocol::prelude::{ExportFormat, FilterPatch, FilteredResults};

use crate::error::CliError;
use crate::{output, render};

/// One line typed into the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Text(String),
    From(Option<String>),
    To(Option<String>),
    Company { id: String, selected: bool },
    EventType { name: String, selected: bool },
    Limit(u32),
    More,
    Clear,
    Refresh,
    Export {
        format: ExportFormat,
        output: Option<PathBuf>,
    },
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, CliError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());

    let command = match word {
        "text" | "search" => ShellCommand::Text(rest.to_string()),
        "from" => ShellCommand::From(optional(rest)),
        "to" => ShellCommand::To(optional(rest)),
        "company" => {
            let (id, selected) = toggle_argument(rest, "company")?;
            ShellCommand::Company { id, selected }
        }
        "type" => {
            let (name, selected) = toggle_argument(rest, "type")?;
            ShellCommand::EventType { name, selected }
        }
        "limit" => match rest.parse::<u32>() {
            Ok(limit) if limit > 0 => ShellCommand::Limit(limit),
            _ => {
                return Err(CliError::Validation(format!(
                    "limit expects a positive number, got '{rest}'"
                )))
            }
        },
        "more" => ShellCommand::More,
        "clear" => ShellCommand::Clear,
        "refresh" => ShellCommand::Refresh,
        "export" => {
            let mut args = rest.split_whitespace();
            let format = match args.next() {
                Some(raw) => raw.parse::<ExportFormat>().map_err(CliError::Validation)?,
                None => ExportFormat::Csv,
            };
            ShellCommand::Export {
                format,
                output: args.next().map(PathBuf::from),
            }
        }
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => {
            return Err(CliError::Validation(format!(
                "unknown command '{other}', type 'help'"
            )))
        }
    };
    Ok(Some(command))
}

fn toggle_argument(raw: &str, command: &str) -> Result<(String, bool), CliError> {
    let (selected, value) = match raw.chars().next() {
        Some('+') => (true, &raw[1..]),
        Some('-') => (false, &raw[1..]),
        _ => (true, raw),
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(CliError::Validation(format!(
            "usage: {command} +<value> | -<value>"
        )));
    }
    Ok((value.to_string(), selected))
}

pub fn print_help() {
    println!("{}", "Commands".bold());
    println!("  text <words>          free-text search (debounced)");
    println!("  from <YYYY-MM-DD>     start date, empty clears");
    println!("  to <YYYY-MM-DD>       end date, empty clears");
    println!("  company +id | -id      select or drop a company");
    println!("  type +name | -name     select or drop an event type");
    println!("  limit <n>             page size");
    println!("  more                  load the next page");
    println!("  clear                 remove all filters");
    println!("  refresh               repeat the current query");
    println!("  export [csv|json] [path]");
    println!("  show                  print filters and results");
    println!("  quit");
}

/// Runs the interactive loop until `quit` or end of input.
pub async fn run(session: SearchSession) -> Result<(), CliError> {
    print_help();
    session.enter_search_view();

    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rendered: Option<(Option<FilteredResults>, Option<String>)> = None;

    prompt()?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => apply(&session, command).await?,
                    Ok(None) => {}
                    Err(err) => eprintln!("{} {err}", "✖".red()),
                }
                prompt()?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if render_if_settled(&snapshot, &mut rendered) {
                    prompt()?;
                }
            }
        }
    }

    debug!("shell closed");
    Ok(())
}

/// Prints results once a search settles on something not shown yet.
fn render_if_settled(
    snapshot: &SearchSnapshot,
    rendered: &mut Option<(Option<FilteredResults>, Option<String>)>,
) -> bool {
    if snapshot.loading {
        return false;
    }
    let current = (snapshot.results.clone(), snapshot.error.clone());
    if rendered.as_ref() == Some(&current) {
        return false;
    }
    println!();
    render::print_results(snapshot);
    *rendered = Some(current);
    true
}

async fn apply(session: &SearchSession, command: ShellCommand) -> Result<(), CliError> {
    match command {
        ShellCommand::Text(text) => session.set_search_text(text),
        ShellCommand::From(date) => session.set_filters(match date {
            Some(date) => FilterPatch::new().start_date(date),
            None => FilterPatch::new().clear_start_date(),
        }),
        ShellCommand::To(date) => session.set_filters(match date {
            Some(date) => FilterPatch::new().end_date(date),
            None => FilterPatch::new().clear_end_date(),
        }),
        ShellCommand::Company { id, selected } => session.toggle_company(&id, selected),
        ShellCommand::EventType { name, selected } => session.toggle_event_type(&name, selected),
        ShellCommand::Limit(limit) => session.set_filters(FilterPatch::new().limit(limit)),
        ShellCommand::More => session.load_more(),
        ShellCommand::Clear => session.clear_filters(),
        ShellCommand::Refresh => session.refresh(),
        ShellCommand::Show => {
            let snapshot = session.snapshot();
            render::print_filters(&snapshot);
            render::print_results(&snapshot);
        }
        ShellCommand::Help => print_help(),
        ShellCommand::Export { format, output } => match session.export(format).await {
            Ok(file) => {
                let path = output::write_export(&file, output.as_deref())?;
                let records = output::record_count(format, &file).ok();
                render::print_export(&file, &path, records);
            }
            Err(err) => eprintln!("{} export failed: {err}", "✖".red()),
        },
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn prompt() -> Result<(), CliError> {
    print!("{} ", "usagedash>".cyan());
    io::stdout().flush()?;
    Ok(())
}
