use bon::Builder;
use ulid::Ulid;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 关联 ID（`correlation_id`）：把同一次交互产生的日志串联起来；
/// - 执行者（`actor`）：例如 `menu`、`import`，仅用于审计日志。
///
/// 典型用法：
/// ```rust
/// use bookstore_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123")
///     .actor("menu")
///     .build();
/// assert_eq!(ctx.correlation_id.as_deref(), Some("cor-123"));
///
/// let generated = AppContext::for_actor("import");
/// assert!(generated.correlation_id.is_some());
/// ```
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq)]
pub struct AppContext {
    /// 关联 ID（可选）
    #[builder(into)]
    pub correlation_id: Option<String>,
    /// 执行者（可选）
    #[builder(into)]
    pub actor: Option<String>,
}

impl AppContext {
    /// 为指定执行者生成带新关联 ID 的上下文
    pub fn for_actor(actor: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(Ulid::new().to_string()),
            actor: Some(actor.into()),
        }
    }

    pub(crate) fn correlation(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or("-")
    }

    pub(crate) fn actor_name(&self) -> &str {
        self.actor.as_deref().unwrap_or("-")
    }
}
