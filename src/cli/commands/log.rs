use crate::cli::parser::Commands;
use crate::core::context::AppContext;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        LogLogic::print_log(ctx.conn())?;
    }

    Ok(())
}
