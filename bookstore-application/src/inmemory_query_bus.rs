use crate::{
    context::AppContext, error::AppError, query::Query, query_bus::QueryBus,
    query_handler::QueryHandler,
};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use tracing::{debug, debug_span};

type BoxAny = Box<dyn Any>;

type QueryHandlerFn = Box<dyn Fn(BoxAny, &AppContext) -> Result<BoxAny, AppError>>;

/// 基于内存的 QueryBus 实现
/// - 通过 TypeId 注册不同 Query 对应的 Handler
/// - 以类型擦除方式调度，并在调用端进行结果还原
#[derive(Default)]
pub struct InMemoryQueryBus {
    // 查询类型决定其 DTO 类型，因此以 Query 的 TypeId 作为键即可
    handlers: HashMap<TypeId, (&'static str, QueryHandlerFn)>,
}

impl InMemoryQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册查询处理器
    pub fn register<Q, H>(&mut self, handler: H) -> Result<(), AppError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let key = TypeId::of::<Q>();
        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegisteredQuery { query: Q::NAME });
        }

        let f: QueryHandlerFn = Box::new(move |boxed_q: BoxAny, ctx: &AppContext| {
            match boxed_q.downcast::<Q>() {
                Ok(q) => {
                    let dto = handler.handle(ctx, *q)?;
                    Ok(Box::new(dto) as BoxAny)
                }
                Err(_) => Err(AppError::TypeMismatch {
                    expected: type_name::<Q>(),
                    found: "unknown",
                }),
            }
        });

        self.handlers.insert(key, (Q::NAME, f));
        debug!(query = Q::NAME, "query handler registered");
        Ok(())
    }

    /// 获取已注册的查询名列表（按名称排序）
    pub fn registered_queries(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }
}

impl QueryBus for InMemoryQueryBus {
    fn dispatch<Q>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query,
    {
        let Some((_, f)) = self.handlers.get(&TypeId::of::<Q>()) else {
            return Err(AppError::HandlerNotFound(Q::NAME));
        };

        let _span = debug_span!(
            "query",
            query = Q::NAME,
            correlation_id = ctx.correlation(),
            actor = ctx.actor_name()
        )
        .entered();

        let out = f(Box::new(q), ctx)?;
        match out.downcast::<Q::Dto>() {
            Ok(dto) => Ok(*dto),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<Q::Dto>(),
                found: "unknown",
            }),
        }
    }
}
