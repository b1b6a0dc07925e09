//! 书店领域过程宏（bookstore-macros）
//!
//! 为领域层提供样板代码生成：
//! - `#[value_object]`：为值对象合并常用派生；
//! - `#[entity_id]`：为单字段 tuple struct 形式的实体标识生成便捷实现；
//! - `#[entity]`：为实体注入 `id` 字段并实现 `Entity` trait；
//! - `#[canonical_enum]`：为“规范标签”枚举生成标签映射、解析与显示实现。
//!
use proc_macro::TokenStream;

mod canonical_enum;
mod entity;
mod entity_id;
mod utils;
mod value_object;

/// 值对象宏
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并派生：Debug（可关闭）、Default、Clone、Serialize、Deserialize、PartialEq、Eq
/// - 参数：`#[value_object(debug = true|false)]`
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 实体 ID 宏
/// 用于 `struct BookId(u64);` 这类包装类型，生成 `new`、`Display`、`FromStr`、
/// `AsRef`/`From` 等实现。仅支持单字段 tuple struct。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 实体宏
/// - 若缺失则在字段最前追加 `id: IdType`
/// - 为目标结构体实现 `::bookstore_domain::entity::Entity`
/// - 参数：`#[entity(id = IdType, debug = true|false)]`，`id` 默认 `String`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 规范标签枚举宏
///
/// 仅支持单元变体。每个变体可用 `#[label = "..."]` 指定规范标签，缺省为变体名。
/// 生成：
/// - 派生 Debug、Clone、Copy、PartialEq、Eq、Hash、Serialize、Deserialize（序列化使用标签）
/// - `ALL` 常量、`label()`、`from_label()`
/// - `Display`（输出标签）
#[proc_macro_attribute]
pub fn canonical_enum(attr: TokenStream, item: TokenStream) -> TokenStream {
    canonical_enum::expand(attr, item)
}
