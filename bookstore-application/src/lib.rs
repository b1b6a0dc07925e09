//! 书店应用层（bookstore-application）
//!
//! 以命令/查询分离的方式编排领域层：
//! - `commands` / `queries`：用例及其处理器；
//! - `inmemory_command_bus` / `inmemory_query_bus`：按类型路由的进程内总线；
//! - `import`：批量导入文件（CSV，或 JSON 数组）的读取；
//! - `Bookstore`：注册全部处理器的门面，供界面层直接使用。
//!
pub mod bookstore;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod commands;
pub mod context;
pub mod dto;
pub mod error;
pub mod import;
pub mod inmemory_command_bus;
pub mod inmemory_query_bus;
pub mod queries;
pub mod query;
pub mod query_bus;
pub mod query_handler;
pub mod state;

pub use bookstore::Bookstore;
pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_query_bus::InMemoryQueryBus;
