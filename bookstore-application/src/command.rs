/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，会修改目录状态。
/// - 只返回执行回执（例如新分配的 ID、调整后的库存），不返回查询数据；
/// - 与 [`Query`](crate::query::Query) 相对，`Command` 应避免读写混用；
/// - 采用“动宾结构”命名，如 `AddBook`、`DeleteBook`。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
pub trait Command: 'static {
    /// 命令的稳定名称（常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 执行回执
    type Output: 'static;
}
