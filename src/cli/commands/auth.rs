use crate::auth::Identity;
use crate::auth::login::{clear_login, store_login};
use crate::cli::parser::Commands;
use crate::core::context::AppContext;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::remote::RemoteClient;
use crate::ui::messages::{info, success, warning};
use std::io::{self, BufRead};

const ENV_PASSWORD: &str = "DEOSIL_PASSWORD";

/// Handle `login`, `logout` and `whoami`.
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    match cmd {
        Commands::Login { email, password } => login(ctx, email, password.clone()),
        Commands::Logout => logout(ctx),
        Commands::Whoami => {
            whoami(ctx);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn read_password(given: Option<String>) -> AppResult<String> {
    if let Some(p) = given.or_else(|| std::env::var(ENV_PASSWORD).ok()) {
        return Ok(p);
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let p = line.trim_end_matches(['\r', '\n']).to_string();
    if p.is_empty() {
        return Err(AppError::Login("empty password".into()));
    }
    Ok(p)
}

fn login(ctx: &AppContext, email: &str, password: Option<String>) -> AppResult<()> {
    let remote = ctx
        .config
        .remote()
        .ok_or_else(|| AppError::Config("remote store is not configured".into()))?;

    let password = read_password(password)?;
    let grant = RemoteClient::new(remote, None)?.password_login(email, &password)?;
    store_login(ctx.conn(), &grant)?;

    ttlog_quiet(ctx.conn(), "login", &grant.user.id, &format!("Logged in as {}", grant.user.label()));
    success(format!("Logged in as {}", grant.user.label()));

    if ctx.config.identity != Identity::Login {
        warning("identity is set to 'tester'; the login is stored but not used");
    }
    Ok(())
}

fn logout(ctx: &AppContext) -> AppResult<()> {
    clear_login(ctx.conn())?;
    ttlog_quiet(ctx.conn(), "logout", "", "Stored login removed");
    success("Logged out");
    Ok(())
}

fn whoami(ctx: &AppContext) {
    match ctx.user() {
        Some(u) => info(format!("User   : {} ({})", u.label(), u.id)),
        None => info("User   : not logged in"),
    }

    let identity = match ctx.config.identity {
        Identity::Login => "login",
        Identity::Tester => "tester",
    };
    println!("Identity : {}", identity);
    println!("Reads    : {:?}", ctx.config.read_policy);

    match ctx.config.remote() {
        Some(r) if ctx.repo().local().mirror().is_enabled() => println!("Remote   : {} (mirroring)", r.url),
        Some(r) => println!("Remote   : {} (not authenticated)", r.url),
        None => println!("Remote   : not configured"),
    }
}
