//! 库存报表
//!
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::book::BookRecord;
use crate::error::DomainError;

/// 报表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSort {
    /// 作者姓氏（`author` 最后一个空白分隔的词），区分大小写
    AlphabeticalAuthor,
    AlphabeticalTitle,
    Category,
    Medium,
    AscendingStock,
    DescendingStock,
}

impl StockSort {
    pub const ALL: [StockSort; 6] = [
        StockSort::AlphabeticalAuthor,
        StockSort::AlphabeticalTitle,
        StockSort::Category,
        StockSort::Medium,
        StockSort::AscendingStock,
        StockSort::DescendingStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockSort::AlphabeticalAuthor => "alphabetical_author",
            StockSort::AlphabeticalTitle => "alphabetical_title",
            StockSort::Category => "category",
            StockSort::Medium => "medium",
            StockSort::AscendingStock => "ascending_stock",
            StockSort::DescendingStock => "descending_stock",
        }
    }

    fn compare(&self, a: &BookRecord, b: &BookRecord) -> Ordering {
        match self {
            StockSort::AlphabeticalAuthor => last_name(&a.author).cmp(last_name(&b.author)),
            StockSort::AlphabeticalTitle => a.title.cmp(&b.title),
            StockSort::Category => a.category.label().cmp(b.category.label()),
            StockSort::Medium => a.medium().label().cmp(b.medium().label()),
            StockSort::AscendingStock => a.stock.cmp(&b.stock),
            StockSort::DescendingStock => b.stock.cmp(&a.stock),
        }
    }
}

impl fmt::Display for StockSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        StockSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == key)
            .ok_or_else(|| DomainError::UnrecognizedSortKey {
                value: key.to_string(),
            })
    }
}

fn last_name(author: &str) -> &str {
    author.split_whitespace().next_back().unwrap_or_default()
}

/// 稳定排序：键相同的记录保持原有相对顺序
pub fn sort_books(books: &mut [BookRecord], sort: StockSort) {
    books.sort_by(|a, b| sort.compare(a, b));
}

/// 排序后的库存清单
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    /// 实际应用的排序；无法识别的排序键为 `None`（保持原顺序）
    pub sort: Option<StockSort>,
    pub entries: Vec<String>,
}

impl StockReport {
    pub fn from_books(sort: Option<StockSort>, books: &[BookRecord]) -> Self {
        Self {
            sort,
            entries: books.iter().map(BookRecord::display_summary).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join("\n\n"))
    }
}
