//! 读操作：检索、库存报表、分类与单本详情
//!
use bookstore_domain::book::BookId;
use bookstore_domain::error::DomainError;

use crate::context::AppContext;
use crate::dto::{BookDetailDto, BookListDto, CategoryListDto, SearchResultDto, StockReportDto};
use crate::error::AppError;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use crate::state::SharedState;

/// 检索；多个条件之间为 AND 关系，命中任一排除条件的记录会被剔除
#[derive(Debug, Clone, Default)]
pub struct SearchBooks {
    pub criteria: Vec<(String, String)>,
    pub exclusions: Vec<(String, String)>,
}

impl SearchBooks {
    /// 单条件检索
    pub fn by(query_type: impl Into<String>, query_value: impl Into<String>) -> Self {
        Self {
            criteria: vec![(query_type.into(), query_value.into())],
            exclusions: Vec::new(),
        }
    }

    /// 追加一个条件
    pub fn and(mut self, query_type: impl Into<String>, query_value: impl Into<String>) -> Self {
        self.criteria.push((query_type.into(), query_value.into()));
        self
    }

    /// 追加一个排除条件
    pub fn except(mut self, query_type: impl Into<String>, query_value: impl Into<String>) -> Self {
        self.exclusions.push((query_type.into(), query_value.into()));
        self
    }
}

impl Query for SearchBooks {
    const NAME: &'static str = "book.search";
    type Dto = SearchResultDto;
}

/// 库存报表（会按排序键原地重排目录）
#[derive(Debug, Clone)]
pub struct GenerateStockReport {
    pub sort_key: String,
}

impl Query for GenerateStockReport {
    const NAME: &'static str = "catalogue.stock_report";
    type Dto = StockReportDto;
}

#[derive(Debug, Clone, Copy)]
pub struct ListCategories;

impl Query for ListCategories {
    const NAME: &'static str = "catalogue.categories";
    type Dto = CategoryListDto;
}

/// 按目录当前顺序列出全部图书
#[derive(Debug, Clone, Copy)]
pub struct ListBooks;

impl Query for ListBooks {
    const NAME: &'static str = "catalogue.books";
    type Dto = BookListDto;
}

#[derive(Debug, Clone)]
pub struct ShowBook {
    pub id: String,
}

impl Query for ShowBook {
    const NAME: &'static str = "book.show";
    type Dto = BookDetailDto;
}

pub struct SearchBooksHandler {
    state: SharedState,
}

impl SearchBooksHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl QueryHandler<SearchBooks> for SearchBooksHandler {
    fn handle(&self, _ctx: &AppContext, q: SearchBooks) -> Result<SearchResultDto, AppError> {
        if q.criteria.is_empty() {
            return Err(AppError::Validation(
                "at least one search criterion is required".into(),
            ));
        }
        let criteria = as_pairs(&q.criteria);
        let exclusions = as_pairs(&q.exclusions);
        let report = self
            .state
            .borrow()
            .catalogue
            .search_excluding(&criteria, &exclusions)?;
        Ok(report.into())
    }
}

fn as_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(t, v)| (t.as_str(), v.as_str())).collect()
}

pub struct StockReportHandler {
    state: SharedState,
}

impl StockReportHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl QueryHandler<GenerateStockReport> for StockReportHandler {
    fn handle(
        &self,
        _ctx: &AppContext,
        q: GenerateStockReport,
    ) -> Result<StockReportDto, AppError> {
        let report = self
            .state
            .borrow_mut()
            .catalogue
            .generate_stock_list(&q.sort_key);
        Ok(report.into())
    }
}

pub struct ListCategoriesHandler {
    state: SharedState,
}

impl ListCategoriesHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl QueryHandler<ListCategories> for ListCategoriesHandler {
    fn handle(&self, _ctx: &AppContext, _q: ListCategories) -> Result<CategoryListDto, AppError> {
        Ok(self.state.borrow().catalogue.unique_categories().into())
    }
}

pub struct ListBooksHandler {
    state: SharedState,
}

impl ListBooksHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl QueryHandler<ListBooks> for ListBooksHandler {
    fn handle(&self, _ctx: &AppContext, _q: ListBooks) -> Result<BookListDto, AppError> {
        Ok(self.state.borrow().catalogue.books().iter().collect())
    }
}

pub struct ShowBookHandler {
    state: SharedState,
}

impl ShowBookHandler {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl QueryHandler<ShowBook> for ShowBookHandler {
    fn handle(&self, _ctx: &AppContext, q: ShowBook) -> Result<BookDetailDto, AppError> {
        let id = BookId::resolve(&q.id)?;
        let state = self.state.borrow();
        let book = state
            .catalogue
            .get(id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;
        Ok(BookDetailDto::from(book))
    }
}
