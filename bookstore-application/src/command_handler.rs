use crate::{command::Command, context::AppContext, error::AppError};

/// 命令处理器
pub trait CommandHandler<C>
where
    C: Command,
{
    fn handle(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>;
}
