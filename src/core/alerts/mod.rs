// Alert subsystem turning gauge levels and emergency signals into alerts.
//
// Architecture:
// - model.rs: Alert record and identifiers
// - triggers.rs: Threshold and emergency trigger evaluation
// - engine.rs: Owns the active list, dedup guard and dismissal

pub mod engine;
pub mod model;
pub mod triggers;
