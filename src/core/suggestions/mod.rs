//! Caretaker suggestions fetched per alert.
//!
//! - fetcher.rs: the asynchronous lookup boundary and its mocked implementation
//! - board.rs: per-alert suggestion storage and the single in-flight marker

pub mod board;
pub mod fetcher;
