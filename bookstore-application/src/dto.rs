use std::fmt;

use bookstore_domain::book::BookRecord;
use bookstore_domain::catalogue::{CategoryEntry, SearchReport};
use bookstore_domain::entity::Entity;
use bookstore_domain::report::StockReport;
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向界面/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层；
/// - 保持只读特性与简洁结构。
pub trait Dto: Serialize + 'static {}

/// 图书概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDto {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub category: String,
    pub medium: String,
    pub stock: i64,
}

impl From<&BookRecord> for BookDto {
    fn from(book: &BookRecord) -> Self {
        Self {
            id: *book.id().value(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            category: book.category().to_string(),
            medium: book.medium().to_string(),
            stock: book.stock(),
        }
    }
}

impl Dto for BookDto {}

/// 目录当前顺序下的全部图书
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookListDto {
    pub books: Vec<BookDto>,
    pub entries: Vec<String>,
}

impl<'a> FromIterator<&'a BookRecord> for BookListDto {
    fn from_iter<I: IntoIterator<Item = &'a BookRecord>>(iter: I) -> Self {
        let (books, entries) = iter
            .into_iter()
            .map(|book| (BookDto::from(book), book.display_summary()))
            .unzip();
        Self { books, entries }
    }
}

impl fmt::Display for BookListDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("The catalogue is empty.");
        }
        f.write_str(&self.entries.join("\n\n"))
    }
}

impl Dto for BookListDto {}

/// 单本图书的完整信息，`lines` 为按载体生成的说明行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetailDto {
    pub book: BookDto,
    pub description: String,
    pub audience: String,
    pub size: u32,
    pub size_unit: String,
    pub purchase_price: String,
    pub selling_price: String,
    pub summary: String,
    pub lines: Vec<String>,
}

impl From<&BookRecord> for BookDetailDto {
    fn from(book: &BookRecord) -> Self {
        Self {
            book: BookDto::from(book),
            description: book.description().to_string(),
            audience: book.audience().to_string(),
            size: book.size(),
            size_unit: book.format().size_label().to_string(),
            purchase_price: book.purchase_price().to_string(),
            selling_price: book.selling_price().to_string(),
            summary: book.display_summary(),
            lines: vec![
                book.display_size(),
                book.display_purchase_price(),
                book.display_selling_price(),
                book.display_stock(),
            ],
        }
    }
}

impl fmt::Display for BookDetailDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        write!(f, "{}", self.lines.join("\n"))
    }
}

impl Dto for BookDetailDto {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultDto {
    pub query_type: String,
    pub query_value: String,
    pub matches: Vec<String>,
    pub rendered: String,
}

impl From<SearchReport> for SearchResultDto {
    fn from(report: SearchReport) -> Self {
        let rendered = report.to_string();
        Self {
            query_type: report.query_type,
            query_value: report.query_value,
            matches: report.matches,
            rendered,
        }
    }
}

impl fmt::Display for SearchResultDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl Dto for SearchResultDto {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReportDto {
    /// 实际应用的排序键；无法识别的键为 `None`
    pub sort_key: Option<String>,
    pub entries: Vec<String>,
}

impl From<StockReport> for StockReportDto {
    fn from(report: StockReport) -> Self {
        Self {
            sort_key: report.sort.map(|s| s.to_string()),
            entries: report.entries,
        }
    }
}

impl fmt::Display for StockReportDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join("\n\n"))
    }
}

impl Dto for StockReportDto {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDto {
    pub index: usize,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListDto {
    pub categories: Vec<CategoryDto>,
}

impl From<Vec<CategoryEntry>> for CategoryListDto {
    fn from(entries: Vec<CategoryEntry>) -> Self {
        Self {
            categories: entries
                .into_iter()
                .map(|e| CategoryDto {
                    index: e.index,
                    category: e.category.to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for CategoryListDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.categories.is_empty() {
            return f.write_str("The catalogue is empty.");
        }
        let lines: Vec<String> = self
            .categories
            .iter()
            .map(|c| format!("{}. {}", c.index, c.category))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

impl Dto for CategoryListDto {}

/// 被拒绝的导入行（`row` 从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// 批量导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub added: Vec<u64>,
    /// 因重复被拒绝的记录所消耗的 ID
    pub duplicates: Vec<u64>,
    pub rejected: Vec<RowFailure>,
}

impl ImportReport {
    pub fn total_rows(&self) -> usize {
        self.added.len() + self.duplicates.len() + self.rejected.len()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} book(s) from {} row(s): {} duplicate(s) skipped, {} row(s) rejected.",
            self.added.len(),
            self.total_rows(),
            self.duplicates.len(),
            self.rejected.len()
        )?;
        for failure in &self.rejected {
            write!(f, "\nRow {}: {}", failure.row, failure.reason)?;
        }
        Ok(())
    }
}

impl Dto for ImportReport {}
