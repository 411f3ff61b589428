pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod gauges;
pub mod model;
pub mod signals;
pub mod state;
pub mod status;
pub mod suggestions;
pub mod ticker;
