#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod core;

pub mod app;
pub mod console;
pub mod monitor;

pub use app::run;
pub use monitor::{Monitor, MonitorError, MonitorHandle};
