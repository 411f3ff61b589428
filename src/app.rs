use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use crate::console::{self, Command};
use crate::core::config::{ConfigManager, Settings};
use crate::core::suggestions::fetcher::CannedSuggestionFetcher;
use crate::monitor::{Monitor, MonitorHandle};

const CONFIG_DIR_VAR: &str = "CARETAKER_CONFIG_DIR";

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        if let Ok(directive) = "caretaker_monitor=info".parse() {
            filter = filter.add_directive(directive);
        }
    }
    // Logs go to stderr so the status panel on stdout stays readable
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_settings() -> Settings {
    let config_dir = std::env::var_os(CONFIG_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config_manager = ConfigManager::new(config_dir);
    let settings = config_manager.load();

    if !config_manager.exists() {
        if let Err(e) = config_manager.save(&settings) {
            log::warn!("Could not write default settings: {}", e);
        }
    }
    settings
}

/// Apply one console line. Returns false when the caretaker asked to quit.
fn handle_line(handle: &MonitorHandle, line: &str) -> bool {
    let command = match console::parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };

    let snapshot = handle.snapshot();
    let sent = match command {
        Command::Dismiss(id) => {
            if !snapshot.alerts.iter().any(|a| a.id == id) {
                println!("No active alert #{}", id);
                return true;
            }
            handle.dismiss(id)
        }
        Command::Suggest(id) => {
            if !snapshot.alerts.iter().any(|a| a.id == id) {
                println!("No active alert #{}", id);
                return true;
            }
            if let Some(current) = snapshot.in_flight {
                println!("Still fetching suggestions for alert #{}", current);
                return true;
            }
            if snapshot.suggestions.contains_key(&id) {
                println!("Suggestions for alert #{} are already shown", id);
                return true;
            }
            handle.request_suggestions(id)
        }
        Command::Status => {
            println!("{}", console::render_snapshot(&snapshot));
            Ok(())
        }
        Command::Json => {
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Failed to encode snapshot: {}", e),
            }
            Ok(())
        }
        Command::Help => {
            println!("{}", console::HELP);
            Ok(())
        }
        Command::Quit => return false,
    };

    match sent {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

async fn serve(settings: Settings) -> io::Result<()> {
    let fetcher = Arc::new(CannedSuggestionFetcher::new(
        settings.suggestions.latency(),
        settings.suggestions.failure_rate,
    ));
    let monitor = Monitor::create(&settings, fetcher);
    let handle = monitor.handle();
    let mut snapshots = handle.subscribe();
    let mut shown = snapshots.borrow_and_update().clone();

    println!("{}", console::HELP);
    println!("{}", console::render_snapshot(&shown));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let next = snapshots.borrow_and_update().clone();
                if console::needs_redraw(&shown, &next) {
                    println!("{}", console::render_snapshot(&next));
                }
                shown = next;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_line(&handle, &line) {
                        break Ok(());
                    }
                }
                // stdin closed
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            },
        }
    };

    monitor.shutdown().await;
    result
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_logging();
    let settings = load_settings();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(settings))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Need, SignalEvent};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_handle_line_dispatches_intents() {
        let mut settings = Settings::default();
        settings.signal_interval_ms = 3_600_000;
        settings.passive_tick_ms = 3_600_000;
        let monitor = Monitor::create(&settings, Arc::new(CannedSuggestionFetcher::new(Duration::ZERO, 0.0)));
        let handle = monitor.handle();
        let mut rx = handle.subscribe();

        handle.tick(SignalEvent::for_need(Need::Emergency)).unwrap();
        rx.wait_for(|s| !s.alerts.is_empty()).await.unwrap();

        assert!(handle_line(&handle, "suggest 1"));
        rx.wait_for(|s| s.suggestions.contains_key(&crate::core::alerts::model::AlertId(1)))
            .await
            .unwrap();

        assert!(handle_line(&handle, "dismiss 1"));
        rx.wait_for(|s| s.alerts.is_empty()).await.unwrap();
        assert!(handle.snapshot().suggestions.is_empty());

        assert!(handle_line(&handle, "dismiss 1"), "unknown ids keep the session alive");
        assert!(handle_line(&handle, "bogus"));
        assert!(!handle_line(&handle, "quit"));

        monitor.shutdown().await;
    }
}
