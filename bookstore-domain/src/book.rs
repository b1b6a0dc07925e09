//! 图书记录（BookRecord）
//!
//! 三种载体共用同一组字段，区别仅在于 `size` 的语义：
//! 纸质书为页数，有声书为分钟数，电子书为 KB。载体与尺寸一起保存在
//! [`BookFormat`] 中，创建后不可变更。
//!
use std::fmt;

use bookstore_macros::{entity, entity_id};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::settings::StockPolicy;
use crate::value_object::{Audience, Category, Medium, Price};

/// 图书标识，由工厂单调分配，删除后不复用
#[entity_id(copy = true)]
pub struct BookId(u64);

impl BookId {
    /// 解析用户输入的 ID
    ///
    /// 不是整数时返回 `InvalidId`；是整数但不可能被分配过（负数或超出范围）时返回 `Ok(None)`。
    pub fn parse_lookup(raw: &str) -> DomainResult<Option<BookId>> {
        let raw = raw.trim();
        let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidId {
                value: raw.to_string(),
            });
        }
        if raw.starts_with('-') {
            return Ok(None);
        }
        Ok(digits.parse::<u64>().ok().map(BookId::new))
    }

    /// 解析指向某条记录的 ID；不可能存在的整数 ID 直接视为 `NotFound`
    pub fn resolve(raw: &str) -> DomainResult<BookId> {
        Self::parse_lookup(raw)?.ok_or_else(|| DomainError::NotFound {
            id: raw.trim().to_string(),
        })
    }
}

/// 载体及其尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookFormat {
    Printed { pages: u32 },
    Audiobook { minutes: u32 },
    EBook { kilobytes: u32 },
}

impl BookFormat {
    /// 按载体解释 `size`
    pub fn new(medium: Medium, size: u32) -> Self {
        match medium {
            Medium::Printed => BookFormat::Printed { pages: size },
            Medium::Audiobook => BookFormat::Audiobook { minutes: size },
            Medium::EBook => BookFormat::EBook { kilobytes: size },
        }
    }

    pub fn medium(&self) -> Medium {
        match self {
            BookFormat::Printed { .. } => Medium::Printed,
            BookFormat::Audiobook { .. } => Medium::Audiobook,
            BookFormat::EBook { .. } => Medium::EBook,
        }
    }

    pub fn size(&self) -> u32 {
        match *self {
            BookFormat::Printed { pages } => pages,
            BookFormat::Audiobook { minutes } => minutes,
            BookFormat::EBook { kilobytes } => kilobytes,
        }
    }

    /// 尺寸单位
    pub fn size_label(&self) -> &'static str {
        match self {
            BookFormat::Printed { .. } => "pages",
            BookFormat::Audiobook { .. } => "minutes",
            BookFormat::EBook { .. } => "KB",
        }
    }
}

/// 目录中的一条图书记录
#[entity(id = BookId)]
#[derive(PartialEq)]
pub struct BookRecord {
    pub(crate) id: BookId,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) description: String,
    pub(crate) category: Category,
    pub(crate) audience: Audience,
    pub(crate) format: BookFormat,
    pub(crate) purchase_price: Price,
    pub(crate) selling_price: Price,
    pub(crate) stock: i64,
}

impl BookRecord {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn medium(&self) -> Medium {
        self.format.medium()
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    pub fn format(&self) -> BookFormat {
        self.format
    }

    pub fn size(&self) -> u32 {
        self.format.size()
    }

    pub fn purchase_price(&self) -> Price {
        self.purchase_price
    }

    pub fn selling_price(&self) -> Price {
        self.selling_price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// 按载体给出尺寸描述
    pub fn display_size(&self) -> String {
        match self.format {
            BookFormat::Printed { pages } => {
                format!("The printed book '{}' has {pages} pages.", self.title)
            }
            BookFormat::Audiobook { minutes } => format!(
                "The audiobook '{}' has a length of {minutes} minutes.",
                self.title
            ),
            BookFormat::EBook { kilobytes } => {
                format!("The e-book '{}' has a size of {kilobytes} KB.", self.title)
            }
        }
    }

    pub fn display_purchase_price(&self) -> String {
        format!(
            "Purchase price for the book {}: {}.",
            self.title, self.purchase_price
        )
    }

    pub fn display_selling_price(&self) -> String {
        format!(
            "Selling price for the book {}: {}.",
            self.title, self.selling_price
        )
    }

    pub fn display_stock(&self) -> String {
        format!("Current stock for the book {}: {}", self.title, self.stock)
    }

    pub fn display_summary(&self) -> String {
        self.to_string()
    }

    /// 重复判定：(title, author, medium) 三元组大小写不敏感相等
    pub fn is_duplicate_of(&self, other: &BookRecord) -> bool {
        self.medium() == other.medium()
            && self.title.to_lowercase() == other.title.to_lowercase()
            && self.author.to_lowercase() == other.author.to_lowercase()
    }

    /// 按增量调整库存，返回调整后的库存
    pub fn update_stock(&mut self, delta: i64, policy: StockPolicy) -> DomainResult<i64> {
        let next = self
            .stock
            .checked_add(delta)
            .ok_or_else(|| DomainError::InvalidValue {
                field: "stock",
                reason: format!("{} + {delta} overflows", self.stock),
            })?;

        if next < 0 && policy == StockPolicy::RejectBelowZero {
            return Err(DomainError::InsufficientStock {
                id: self.id.to_string(),
                stock: self.stock,
                delta,
            });
        }

        self.stock = next;
        Ok(next)
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Id: {}\nTitle: {}\nAuthor(s): {}\nCategory: {}\nMedium: {}\nStock: {}",
            self.id,
            self.title,
            self.author,
            self.category,
            self.medium(),
            self.stock
        )
    }
}
