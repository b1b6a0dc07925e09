use crate::{context::AppContext, error::AppError, query::Query};

/// 查询总线（Query Bus）
///
/// - 负责根据查询的具体类型路由到对应的处理器；
/// - 对外返回与查询关联的 DTO 类型。
pub trait QueryBus {
    /// 分发查询到对应处理器，返回该查询的 DTO
    fn dispatch<Q>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query;
}
