use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// Creates the config directory and file (left untouched with `--test`),
/// the SQLite database and runs all pending migrations.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test, cli.config.as_deref())?;
    let path = cli.config.clone().unwrap_or_else(Config::config_file);

    println!("⚙️  Initializing deosil…");
    println!("📄 Config file : {}", path.display());
    println!("🗄️  Database   : {}", cfg.database);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    println!("✅ Database initialized at {}", cfg.database);

    ttlog_quiet(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", cfg.database),
    );

    println!("🎉 deosil initialization completed!");
    Ok(())
}
