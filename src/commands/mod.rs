//! Application command handlers for venbluez.
//!
//! # Commands
//! - `capture`: Probe, pair, locate the headset source and record (default)
//! - `check`: Preflight and reachability probe only
//! - `sources`: List audio input sources
//! - `config`: Open the configuration file in the user's editor
//! - `logs`: Display recent log entries

pub mod capture;
pub mod check;
pub mod config;
pub mod logs;
pub mod sources;

pub use capture::handle_capture;
pub use check::handle_check;
pub use config::handle_config;
pub use logs::handle_logs;
pub use sources::handle_sources;
