use clap::Parser;

mod cli;
mod config;
mod error;
mod version;
mod schema;
mod models;
mod repositories;
mod substrate;
mod vm;
mod auth;
mod middlewares;
mod services;
mod server;
mod boot;
mod utils;

/// Manage containerized workloads as virtual machines reachable over ssh.
/// Desired state lives in the relational store, a reconciliation loop drives
/// the substrate towards it.
#[ntex::main]
async fn main() -> std::io::Result<()> {
  let args = cli::Cli::parse();
  vmhive_utils::logger::enable_logger("vmhived");
  log::info!(
    "vmhived_{}_v{}:{}",
    version::ARCH,
    version::VERSION,
    version::COMMIT_ID
  );
  let config = match config::init(&args) {
    Err(err) => {
      err.print_and_exit();
    }
    Ok(config) => config,
  };
  let boot_state = match boot::init(&config).await {
    Err(err) => {
      error::CliError::from(err).print_and_exit();
    }
    Ok(boot_state) => boot_state,
  };
  let server = server::gen(boot_state.state.clone())?;
  // runs until the process receives a stop signal
  server.await?;
  // closing the channels stops the reconciler and the reaper before their
  // next tick, in-flight items complete first
  drop(boot_state.reconciler_tx);
  drop(boot_state.reaper_tx);
  log::info!("shutdown");
  Ok(())
}
