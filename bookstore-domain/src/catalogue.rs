//! 目录（Catalogue）
//!
//! 持有全部在册图书，负责重复拒绝、删除、检索、分类枚举与库存报表。
//! 任一操作失败都不会改变目录内容。
//!
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::book::{BookId, BookRecord};
use crate::error::{DomainError, DomainResult};
use crate::report::{StockReport, StockSort, sort_books};
use crate::settings::CatalogueSettings;
use crate::specification::{FieldEquals, Specification};
use crate::value_object::Category;

/// 加入目录的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(BookId),
    /// 与已有记录重复而被拒绝；被拒记录的 ID 已分配，不再复用
    Duplicate { rejected: BookId, existing: BookId },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// 分类及其展示序号（从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub index: usize,
    pub category: Category,
}

/// 检索结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub query_type: String,
    pub query_value: String,
    pub matches: Vec<String>,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matches.is_empty() {
            return write!(
                f,
                "No books matching the query type {} and the query value {} found in the catalogue.",
                self.query_type, self.query_value
            );
        }
        f.write_str(&self.matches.join("\n\n"))
    }
}

/// 内存目录
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    books: Vec<BookRecord>,
    settings: CatalogueSettings,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CatalogueSettings) -> Self {
        Self {
            books: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &CatalogueSettings {
        &self.settings
    }

    /// 当前顺序下的全部记录
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.id == id)
    }

    /// 加入一条记录
    ///
    /// (title, author, medium) 与已有记录大小写不敏感相等时拒绝，
    /// 仅给出提示，不视为硬错误。
    pub fn add(&mut self, book: BookRecord) -> AddOutcome {
        if let Some(existing) = self.books.iter().find(|b| b.is_duplicate_of(&book)) {
            warn!(
                book_id = %book.id,
                existing_id = %existing.id,
                title = %book.title,
                "{}",
                DomainError::DuplicateRecord {
                    title: book.title.clone(),
                    author: book.author.clone(),
                    medium: book.medium().to_string(),
                }
            );
            return AddOutcome::Duplicate {
                rejected: book.id,
                existing: existing.id,
            };
        }

        debug!(book_id = %book.id, title = %book.title, "book added to catalogue");
        let id = book.id;
        self.books.push(book);
        AddOutcome::Added(id)
    }

    /// 按文本 ID 删除，返回确认信息
    pub fn delete(&mut self, raw_id: &str) -> DomainResult<String> {
        let id = BookId::resolve(raw_id)?;
        let removed = self.remove(id)?;
        Ok(format!(
            "The book with the title '{}' and the ID {} was successfully removed.",
            removed.title, removed.id
        ))
    }

    /// 删除首条匹配的记录并返回它
    pub fn remove(&mut self, id: BookId) -> DomainResult<BookRecord> {
        let pos = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;
        let removed = self.books.remove(pos);
        info!(book_id = %id, title = %removed.title, "book removed");
        Ok(removed)
    }

    /// 单条件检索
    pub fn search(&self, query_type: &str, query_value: &str) -> DomainResult<SearchReport> {
        let spec = FieldEquals::parse(query_type, query_value)?;
        Ok(SearchReport {
            query_type: spec.field().to_string(),
            query_value: spec.value().to_string(),
            matches: self.find(&spec).map(BookRecord::display_summary).collect(),
        })
    }

    /// 多条件（AND）检索；单个条件时等同于 [`Catalogue::search`]
    pub fn search_all(&self, criteria: &[(&str, &str)]) -> DomainResult<SearchReport> {
        self.search_excluding(criteria, &[])
    }

    /// 多条件检索，并排除满足任一排除条件的记录
    ///
    /// 至少需要一个包含条件。
    pub fn search_excluding(
        &self,
        criteria: &[(&str, &str)],
        exclusions: &[(&str, &str)],
    ) -> DomainResult<SearchReport> {
        let included = parse_all(criteria)?;
        let excluded = parse_all(exclusions)?;

        let query_type = describe(&included, &excluded, |s| s.field().to_string());
        let query_value = describe(&included, &excluded, |s| s.value().to_string());

        let mut included = included.into_iter();
        let Some(first) = included.next() else {
            return Err(DomainError::InvalidQueryType {
                value: String::new(),
            });
        };
        let init: Box<dyn Specification<BookRecord>> = Box::new(first);
        let combined = included.fold(init, |acc, next| {
            let joined: Box<dyn Specification<BookRecord>> = Box::new(acc.and(next));
            joined
        });
        let combined = excluded.into_iter().fold(combined, |acc, next| {
            let joined: Box<dyn Specification<BookRecord>> = Box::new(acc.and(next.not()));
            joined
        });

        Ok(SearchReport {
            query_type,
            query_value,
            matches: self
                .find(&combined)
                .map(BookRecord::display_summary)
                .collect(),
        })
    }

    /// 满足规约的记录
    pub fn find<'a, S>(&'a self, spec: &'a S) -> impl Iterator<Item = &'a BookRecord> + 'a
    where
        S: Specification<BookRecord> + ?Sized,
    {
        self.books.iter().filter(move |b| spec.is_satisfied_by(b))
    }

    /// 在册分类，按首次出现的顺序编号
    pub fn unique_categories(&self) -> Vec<CategoryEntry> {
        let mut seen = HashSet::new();
        self.books
            .iter()
            .map(|b| b.category)
            .filter(|c| seen.insert(*c))
            .enumerate()
            .map(|(i, category)| CategoryEntry {
                index: i + 1,
                category,
            })
            .collect()
    }

    /// 按增量调整库存，遵循 [`CatalogueSettings`] 中的库存策略
    pub fn update_stock(&mut self, id: BookId, delta: i64) -> DomainResult<i64> {
        let policy = self.settings.stock_policy();
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;
        let stock = book.update_stock(delta, policy)?;
        info!(book_id = %id, delta, stock, "stock updated");
        Ok(stock)
    }

    /// 生成库存清单
    ///
    /// 会原地重排目录；无法识别的排序键不改变顺序，仍返回当前清单。
    pub fn generate_stock_list(&mut self, sort_key: &str) -> StockReport {
        let sort = match sort_key.parse::<StockSort>() {
            Ok(sort) => {
                sort_books(&mut self.books, sort);
                Some(sort)
            }
            Err(e) => {
                warn!(sort_key, "{e}; keeping current order");
                None
            }
        };
        StockReport::from_books(sort, &self.books)
    }
}

fn parse_all(pairs: &[(&str, &str)]) -> DomainResult<Vec<FieldEquals>> {
    pairs.iter().map(|(t, v)| FieldEquals::parse(t, v)).collect()
}

/// 包含条件以 " and " 连接，排除条件追加为 " and not ..."
fn describe(
    included: &[FieldEquals],
    excluded: &[FieldEquals],
    f: impl Fn(&FieldEquals) -> String,
) -> String {
    included
        .iter()
        .map(&f)
        .chain(excluded.iter().map(|s| format!("not {}", f(s))))
        .collect::<Vec<_>>()
        .join(" and ")
}
