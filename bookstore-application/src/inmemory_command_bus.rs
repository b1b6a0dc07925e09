use crate::{
    command::Command, command_bus::CommandBus, command_handler::CommandHandler,
    context::AppContext, error::AppError,
};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use tracing::{debug, debug_span};

type BoxAny = Box<dyn Any>;

type CmdHandlerFn = Box<dyn Fn(BoxAny, &AppContext) -> Result<BoxAny, AppError>>;

/// 基于内存的 CommandBus 实现
/// - 通过 TypeId 注册不同 Command 对应的 Handler
/// - 运行时以类型擦除（Any）方式进行调度
#[derive(Default)]
pub struct InMemoryCommandBus {
    handlers: HashMap<TypeId, (&'static str, CmdHandlerFn)>,
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器；同一命令只能注册一次
    pub fn register<C, H>(&mut self, handler: H) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let key = TypeId::of::<C>();
        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegisteredCommand { command: C::NAME });
        }

        let f: CmdHandlerFn = Box::new(move |boxed_cmd: BoxAny, ctx: &AppContext| {
            // 键与闭包同一泛型 C，正常情况下 downcast 不会失败
            match boxed_cmd.downcast::<C>() {
                Ok(cmd) => handler
                    .handle(ctx, *cmd)
                    .map(|out| Box::new(out) as BoxAny),
                Err(_) => Err(AppError::TypeMismatch {
                    expected: C::NAME,
                    found: "unknown",
                }),
            }
        });

        self.handlers.insert(key, (C::NAME, f));
        debug!(command = C::NAME, "command handler registered");
        Ok(())
    }

    /// 已注册的命令名（按名称排序）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }
}

impl CommandBus for InMemoryCommandBus {
    fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>
    where
        C: Command,
    {
        let Some((_, f)) = self.handlers.get(&TypeId::of::<C>()) else {
            return Err(AppError::HandlerNotFound(C::NAME));
        };

        let _span = debug_span!(
            "command",
            command = C::NAME,
            correlation_id = ctx.correlation(),
            actor = ctx.actor_name()
        )
        .entered();

        let out = f(Box::new(cmd), ctx)?;
        match out.downcast::<C::Output>() {
            Ok(out) => Ok(*out),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<C::Output>(),
                found: "unknown",
            }),
        }
    }
}
