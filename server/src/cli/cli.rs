// server/src/cli/cli.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use lib::{ClinicDatabase, ClinicError};
use log::{debug, log, Level};

use crate::cli::commands::{CliArgs, Commands};
use crate::cli::config::{init_logging, load_cli_config};
use crate::cli::handlers::{self, CliContext};

/// CLI entry point: parse, configure, log in, dispatch. Failures are shown
/// as a blocking notice and turned into a non-zero exit code by `main`.
pub async fn start_cli() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = load_cli_config(args.config.as_deref())?;
    init_logging(&config);
    debug!("Parsed arguments: {:?}", args.command);

    let db = ClinicDatabase::open(&config).context("Failed to open clinic storage")?;
    let mut ctx = CliContext::new(db, config.export.output_directory.clone());

    let result = run_command(&mut ctx, args).await;
    ctx.db.flush()?;
    if let Err(e) = &result {
        log!(failure_level(e), "Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }
    result
}

/// Request mistakes (bad input, missing records, denied access) are logged
/// as warnings; everything else is an error.
fn failure_level(e: &anyhow::Error) -> Level {
    match e.downcast_ref::<ClinicError>() {
        Some(clinic) if clinic.is_user_facing() => Level::Warn,
        _ => Level::Error,
    }
}

pub async fn run_command(ctx: &mut CliContext, args: CliArgs) -> Result<()> {
    match args.command {
        Commands::RecoverPassword => {
            handlers::handle_recover_password();
            return Ok(());
        }
        Commands::Seed => return handlers::handle_seed(ctx),
        _ => {}
    }

    let outcome = ctx.authenticate(args.username.as_deref(), args.password.as_deref())?;
    match args.command {
        Commands::Login => handlers::handle_login(outcome.as_ref()),
        Commands::Users => handlers::handle_users(ctx),
        Commands::Lookup { national_id } => handlers::handle_lookup(ctx, &national_id),
        Commands::Patient(command) => handlers::handle_patient(ctx, command),
        Commands::Doctor(command) => handlers::handle_doctor(ctx, command),
        Commands::Visit(command) => handlers::handle_visit(ctx, command).await,
        Commands::Export(export) => handlers::handle_export(ctx, export).await,
        Commands::Seed | Commands::RecoverPassword => Ok(()),
    }
}
