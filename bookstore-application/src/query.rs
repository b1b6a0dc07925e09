use crate::dto::Dto;

/// 应用层查询（Query）
///
/// 表达只读意图。
/// - 结果返回 [`Dto`](crate::dto::Dto)；
/// - 与 [`Command`](crate::command::Command) 相对，`Query` 应避免副作用。
///   唯一的例外是库存报表：它按原有语义对目录做原地排序。
pub trait Query: 'static {
    /// 查询的稳定名称（常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 查询返回的数据传输对象（序列化友好、与领域模型解耦）
    type Dto: Dto;
}
