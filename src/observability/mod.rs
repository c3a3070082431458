//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing` in every module
//! - The subscriber is installed once, by the binary, never by the library
//! - Logs go to stderr; stdout is reserved for command output

pub mod logging;

pub use logging::init_logging;
