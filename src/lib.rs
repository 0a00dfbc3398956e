//! capsniff turns text packet captures into per-source counters and heuristic alerts.
pub mod analyser;
pub mod ui;
