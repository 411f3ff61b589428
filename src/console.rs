//! Line-oriented console front end: renders snapshots and parses caretaker
//! commands. Reads state only; every change goes back through the monitor.

use std::fmt::Write;

use thiserror::Error;

use crate::core::alerts::model::AlertId;
use crate::core::model::{Need, Urgency};
use crate::core::state::MonitorSnapshot;

pub const HELP: &str = "Commands:
  dismiss <id>   dismiss an alert and reset its need level
  suggest <id>   fetch caregiver suggestions for an alert
  status         show the full status panel
  json           print the current snapshot as JSON
  help           show this help
  quit           stop monitoring";

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Dismiss(AlertId),
    Suggest(AlertId),
    Status,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{0}' needs an alert id")]
    MissingId(&'static str),
    #[error("'{0}' is not an alert id")]
    InvalidId(String),
}

fn parse_id(command: &'static str, arg: Option<&str>) -> Result<AlertId, CommandError> {
    let raw = arg.ok_or(CommandError::MissingId(command))?;
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(AlertId)
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.split_whitespace();
    let word = parts.next().unwrap_or("").to_lowercase();
    match word.as_str() {
        "dismiss" | "d" => parse_id("dismiss", parts.next()).map(Command::Dismiss),
        "suggest" | "s" => parse_id("suggest", parts.next()).map(Command::Suggest),
        "status" | "" => Ok(Command::Status),
        "json" => Ok(Command::Json),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Whether anything a caretaker acts on changed. Gauge drift alone does not
/// trigger a redraw.
pub fn needs_redraw(previous: &MonitorSnapshot, next: &MonitorSnapshot) -> bool {
    previous.status != next.status
        || previous.last_message != next.last_message
        || previous.in_flight != next.in_flight
        || previous.suggestions != next.suggestions
        || previous.alerts.len() != next.alerts.len()
        || previous
            .alerts
            .iter()
            .zip(&next.alerts)
            .any(|(a, b)| a.id != b.id)
}

fn gauge_bar(level: u8) -> String {
    let filled = usize::from(level) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn urgency_tag(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::High => "HIGH",
        Urgency::Medium => "MED",
        Urgency::Low => "LOW",
        Urgency::None => "-",
    }
}

pub fn render_snapshot(snapshot: &MonitorSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== Patient: {} | comfort {:.0}% ==",
        snapshot.status.label(),
        snapshot.comfort_score
    );
    let _ = writeln!(out, "Last signal: {}", snapshot.last_message);

    for need in Need::GROWABLE {
        let level = snapshot.gauges.level(need).unwrap_or(0);
        let _ = writeln!(out, "  {:<9}[{}] {:>3}", need.display_name(), gauge_bar(level), level);
    }

    if snapshot.alerts.is_empty() {
        let _ = writeln!(out, "No active alerts.");
    } else {
        let _ = writeln!(out, "Alerts (newest first):");
        for alert in &snapshot.alerts {
            let _ = writeln!(
                out,
                "  #{:<4} {:<4} {:<9} {}  {}",
                alert.id,
                urgency_tag(alert.urgency),
                alert.need.display_name(),
                alert.timestamp.format("%H:%M:%S"),
                alert.message
            );
            if snapshot.in_flight == Some(alert.id) {
                let _ = writeln!(out, "         fetching suggestions...");
            }
            if let Some(suggestions) = snapshot.suggestions.get(&alert.id) {
                for suggestion in suggestions {
                    let _ = writeln!(out, "         - {}", suggestion);
                }
            }
        }
    }

    out.trim_end().to_string()
}
