//! deosil library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (store, remote mirror, lifecycle, reports).

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod remote;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::context::AppContext;
use crate::errors::AppResult;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "DEOSIL_LOG";

/// Diagnostics go to stderr; `DEOSIL_LOG` (or `RUST_LOG`) sets the filter.
fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => return cli::commands::init::handle(cli),
        Commands::Config { .. } => {
            let path = cli.config.clone().unwrap_or_else(Config::config_file);
            return cli::commands::config::handle(&cli.command, &cfg, &path);
        }
        _ => {}
    }

    let ctx = AppContext::open(cfg)?;

    let result = match &cli.command {
        Commands::In | Commands::Out | Commands::Toggle => {
            cli::commands::clock::handle(&cli.command, &ctx)
        }
        Commands::Status => cli::commands::status::handle(&ctx),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, &ctx),
        Commands::Month { .. } => cli::commands::month::handle(&cli.command, &ctx),
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {
            cli::commands::auth::handle(&cli.command, &ctx)
        }
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, &ctx),
        Commands::Init | Commands::Config { .. } => Ok(()),
    };

    // pending mirror uploads finish before the process exits
    ctx.shutdown();
    result
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_logging();

    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    tracing::debug!(database = %cfg.database, policy = ?cfg.read_policy, "configuration loaded");

    dispatch(&cli, cfg)
}
