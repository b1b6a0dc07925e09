//! 书店目录领域层（bookstore-domain）
//!
//! 以 DDD 的方式为小型书店的内存目录建模：
//! - 值对象（`value_object`）：分类、载体、读者等规范枚举与金额 `Price`
//! - 实体（`entity`、`book`）：带标识的图书记录及其载体相关行为
//! - 工厂（`factory`）：手工录入的校验与批量导入行的强制转换，统一分配 ID
//! - 规约（`specification`）：以可组合的规则表达检索条件
//! - 目录（`catalogue`）与报表（`report`）：重复拒绝、删除、检索与排序清单
//!
//! 本 crate 只包含同步、单线程的领域逻辑，不涉及任何 I/O；
//! 命令/查询编排位于 `bookstore-application`。
//!
//! 典型用法：
//! 1. 通过 `BookFactory::handle_new_book_input` 或 `from_row` 创建记录并加入 `Catalogue`；
//! 2. 使用 `Catalogue::search` / `search_all` 检索；
//! 3. 使用 `Catalogue::generate_stock_list` 生成排序后的库存清单。
//!
pub mod book;
pub mod catalogue;
pub mod entity;
pub mod error;
pub mod factory;
pub mod report;
pub mod settings;
pub mod specification;
pub mod value_object;

// 允许在本 crate 内部通过 ::bookstore_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 中也能解析。
extern crate self as bookstore_domain;
