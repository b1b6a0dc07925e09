//! 规约（Specification）
//!
//! 目录检索以规约表达：单个检索条件对应一个 [`FieldEquals`]，
//! 多个条件以 `and` 组合，排除条件以 `not` 取反。
//!
use std::fmt;
use std::str::FromStr;

use crate::book::{BookId, BookRecord};
use crate::error::{DomainError, DomainResult};

/// 对候选对象的一条判定规则
pub trait Specification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 两条规则同时满足
    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        And(self, other)
    }

    /// 取反，用于检索中的排除条件
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<T> Specification<T> for Box<dyn Specification<T>> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.as_ref().is_satisfied_by(candidate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct And<A, B>(A, B);

impl<T, A: Specification<T>, B: Specification<T>> Specification<T> for And<A, B> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) && self.1.is_satisfied_by(candidate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Not<S>(S);

impl<T, S: Specification<T>> Specification<T> for Not<S> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.0.is_satisfied_by(candidate)
    }
}

/// 可检索的字段（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    BookId,
    Title,
    Author,
    Category,
    Medium,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::BookId,
        SearchField::Title,
        SearchField::Author,
        SearchField::Category,
        SearchField::Medium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::BookId => "book_id",
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Category => "category",
            SearchField::Medium => "medium",
        }
    }

    /// 字段的字符串形式，用于比较
    pub fn value_of(&self, book: &BookRecord) -> String {
        match self {
            SearchField::BookId => book.id.to_string(),
            SearchField::Title => book.title.clone(),
            SearchField::Author => book.author.clone(),
            SearchField::Category => book.category.to_string(),
            SearchField::Medium => book.medium().to_string(),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        SearchField::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or(DomainError::InvalidQueryType { value: normalized })
    }
}

/// 字段值大小写不敏感的精确相等（非子串、非模糊匹配）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEquals {
    field: SearchField,
    /// 去除首尾空白后的原始输入，用于展示
    value: String,
    needle: String,
}

impl FieldEquals {
    pub fn new(field: SearchField, value: &str) -> Self {
        let value = value.trim();
        Self {
            field,
            value: value.to_string(),
            needle: value.to_lowercase(),
        }
    }

    /// 解析并校验一个检索条件
    ///
    /// `book_id` 的取值必须是整数；负数或超出范围的整数合法，只是不会命中任何记录。
    pub fn parse(query_type: &str, query_value: &str) -> DomainResult<Self> {
        let field: SearchField = query_type.parse()?;
        if field == SearchField::BookId {
            BookId::parse_lookup(query_value)?;
        }
        Ok(Self::new(field, query_value))
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Specification<BookRecord> for FieldEquals {
    fn is_satisfied_by(&self, candidate: &BookRecord) -> bool {
        self.field.value_of(candidate).to_lowercase() == self.needle
    }
}
