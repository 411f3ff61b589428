#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

fn main() {
    if let Err(e) = caretaker_monitor::run() {
        eprintln!("caretaker-monitor: {}", e);
        std::process::exit(1);
    }
}
