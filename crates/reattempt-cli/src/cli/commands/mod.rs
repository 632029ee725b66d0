//! CLI command handlers. Each command is in its own file.

pub mod plan;
pub mod run;

pub use plan::run_plan;
pub use run::run_command;
