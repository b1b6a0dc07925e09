use std::path::Path;

use bookstore_domain::settings::CatalogueSettings;
use tracing::info;

use crate::command::Command;
use crate::command_bus::CommandBus;
use crate::commands::{
    AddBook, AddBookHandler, DeleteBook, DeleteBookHandler, ImportBooks, ImportBooksHandler,
    UpdateStock, UpdateStockHandler,
};
use crate::context::AppContext;
use crate::dto::ImportReport;
use crate::error::AppError;
use crate::import::load_rows;
use crate::inmemory_command_bus::InMemoryCommandBus;
use crate::inmemory_query_bus::InMemoryQueryBus;
use crate::queries::{
    GenerateStockReport, ListBooks, ListBooksHandler, ListCategories, ListCategoriesHandler,
    SearchBooks, SearchBooksHandler, ShowBook, ShowBookHandler, StockReportHandler,
};
use crate::query::Query;
use crate::query_bus::QueryBus;
use crate::state::{BookstoreState, SharedState, shared};

/// 书店应用门面：持有会话状态，并把命令/查询路由到已注册的处理器
pub struct Bookstore {
    state: SharedState,
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
}

impl Bookstore {
    pub fn new(settings: CatalogueSettings) -> Result<Self, AppError> {
        let state = shared(BookstoreState::new(settings));

        let mut commands = InMemoryCommandBus::new();
        commands.register::<AddBook, _>(AddBookHandler::new(state.clone()))?;
        commands.register::<ImportBooks, _>(ImportBooksHandler::new(state.clone()))?;
        commands.register::<DeleteBook, _>(DeleteBookHandler::new(state.clone()))?;
        commands.register::<UpdateStock, _>(UpdateStockHandler::new(state.clone()))?;

        let mut queries = InMemoryQueryBus::new();
        queries.register::<SearchBooks, _>(SearchBooksHandler::new(state.clone()))?;
        queries.register::<GenerateStockReport, _>(StockReportHandler::new(state.clone()))?;
        queries.register::<ListCategories, _>(ListCategoriesHandler::new(state.clone()))?;
        queries.register::<ListBooks, _>(ListBooksHandler::new(state.clone()))?;
        queries.register::<ShowBook, _>(ShowBookHandler::new(state.clone()))?;

        Ok(Self {
            state,
            commands,
            queries,
        })
    }

    /// 执行命令
    pub fn execute<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError> {
        self.commands.dispatch(ctx, cmd)
    }

    /// 执行查询
    pub fn ask<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError> {
        self.queries.dispatch(ctx, q)
    }

    /// 从 CSV 或 JSON 文件批量导入
    pub fn import_file(&self, ctx: &AppContext, path: &Path) -> Result<ImportReport, AppError> {
        let rows = load_rows(path)?;
        info!(path = %path.display(), rows = rows.len(), "importing books");
        self.execute(ctx, ImportBooks { rows })
    }

    pub fn len(&self) -> usize {
        self.state.borrow().catalogue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.commands.registered_commands()
    }

    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.queries.registered_queries()
    }
}
