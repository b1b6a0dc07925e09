use crate::{command::Command, context::AppContext, error::AppError};

/// 命令总线（Command Bus）
///
/// - 负责根据命令的具体类型路由到对应的处理器；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
pub trait CommandBus {
    /// 分发命令到对应处理器
    ///
    /// - `ctx`：应用上下文（关联 ID、执行者）
    /// - `cmd`：具体命令实例
    fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>
    where
        C: Command;
}
