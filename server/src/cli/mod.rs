// server/src/cli/mod.rs

// Modules of the command-line front end and the re-exports used by main.rs.

pub mod cli;
pub mod commands;
pub mod config;
pub mod handlers;

pub use cli::{run_command, start_cli};
pub use commands::{CliArgs, Commands, DoctorCommand, ExportArgs, PatientCommand, VisitCommand};
pub use config::{init_logging, load_cli_config};
pub use handlers::CliContext;
