//! High-level operations that correspond to CLI commands
//!
//! These modules contain the workflow for each movie-tidy command,
//! separated from CLI concerns like argument parsing and signal handling.

pub mod run;

pub use run::{run_operation, RunOptions};
