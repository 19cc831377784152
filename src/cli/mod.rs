//! CLI command handlers

pub mod commands;

pub use commands::{dump, inspect, map, usage, DumpFormat, ScanOptions};
