// server/src/main.rs

// Entry point of the clinic CLI. Argument parsing and dispatch live in cli.
use anyhow::Result;
use policlinico_server::cli::start_cli;

#[tokio::main]
async fn main() -> Result<()> {
    start_cli().await
}
