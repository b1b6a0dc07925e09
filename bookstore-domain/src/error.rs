//! 领域层统一错误定义
//!
//! 覆盖录入校验、数值转换、目录操作与库存规则等最小必要集合。
//! 所有错误均以值的形式返回，任何一次失败都不会破坏目录状态。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    // --- 录入校验 ---
    #[error("Missing or empty required field: {field}")]
    MissingField { field: &'static str },
    #[error("Invalid {field} value '{value}'. {field} must be one of: {expected}")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("Error converting data: field={field}, value='{value}': {reason}")]
    Conversion {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("Invalid {field} value: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    // --- 目录操作 ---
    #[error("The book {title} by {author} already exists in the catalogue.")]
    DuplicateRecord {
        title: String,
        author: String,
        medium: String,
    },
    #[error(
        "Invalid book ID '{value}'. Please provide an ID consisting of only numeric characters."
    )]
    InvalidId { value: String },
    #[error("No book with the provided ID {id} was found in the catalogue.")]
    NotFound { id: String },
    #[error(
        "Invalid query type: {value}. Please provide one of the following query types: book_id, title, author, category, or medium."
    )]
    InvalidQueryType { value: String },
    #[error("Unrecognized sort key: {value}")]
    UnrecognizedSortKey { value: String },

    // --- 库存规则 ---
    #[error("Insufficient stock for book {id}: current stock {stock}, requested change {delta}")]
    InsufficientStock { id: String, stock: i64, delta: i64 },
}

impl DomainError {
    /// 构造数值转换错误
    pub fn conversion(
        field: &'static str,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        DomainError::Conversion {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
