use crate::{context::AppContext, error::AppError, query::Query};

/// 查询处理器
pub trait QueryHandler<Q>
where
    Q: Query,
{
    fn handle(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>;
}
