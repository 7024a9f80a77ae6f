pub mod commands;
pub mod config;
pub mod fs;
pub mod git;
pub mod models;
pub mod orchestrator;
pub mod resolve;
pub mod telemetry;

/// Directory inside the repository root that holds taskmerge's own files
pub const WORK_DIR_NAME: &str = ".taskmerge";
