//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑：
//! - 规范枚举：`Category`、`Medium`、`Audience`；
//! - 金额：`Price`（以分为单位存储，保留两位小数）。
//!
use std::fmt;

use bookstore_macros::{canonical_enum, value_object};

use crate::error::{DomainError, DomainResult};

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 规范形式：去除首尾空白，首字母大写，其余字母小写
///
/// ```
/// use bookstore_domain::value_object::canonicalize;
///
/// assert_eq!(canonicalize("  e-BOOK "), "E-book");
/// assert_eq!(canonicalize("young ADULTS"), "Young adults");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// 具备规范标签的封闭枚举
pub trait CanonicalValue: Sized + Copy + 'static {
    /// 录入时使用的字段名
    const FIELD: &'static str;

    fn all() -> &'static [Self];

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self>;

    /// 可选值列表，用于错误提示
    fn expected() -> String {
        Self::all()
            .iter()
            .map(|v| v.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 大小写不敏感地解析：先规范化，再与标签精确比较
    fn parse_canonical(raw: &str) -> DomainResult<Self> {
        Self::from_label(&canonicalize(raw)).ok_or_else(|| DomainError::InvalidEnumValue {
            field: Self::FIELD,
            value: raw.trim().to_string(),
            expected: Self::expected(),
        })
    }
}

macro_rules! impl_canonical_value {
    ($ty:ty, $field:literal) => {
        impl CanonicalValue for $ty {
            const FIELD: &'static str = $field;

            fn all() -> &'static [Self] {
                <$ty>::ALL
            }

            fn label(&self) -> &'static str {
                <$ty>::label(self)
            }

            fn from_label(label: &str) -> Option<Self> {
                <$ty>::from_label(label)
            }
        }
    };
}

/// 图书分类
#[canonical_enum]
pub enum Category {
    Fiction,
    #[label = "Non-fiction"]
    NonFiction,
}

/// 载体形式，决定 `size` 字段的语义
#[canonical_enum]
pub enum Medium {
    Printed,
    Audiobook,
    #[label = "E-book"]
    EBook,
}

/// 目标读者
#[canonical_enum]
pub enum Audience {
    Children,
    #[label = "Young adults"]
    YoungAdults,
    Adults,
}

impl_canonical_value!(Category, "category");
impl_canonical_value!(Medium, "medium");
impl_canonical_value!(Audience, "audience");

/// 金额（非负，精确到分）
///
/// # 示例
///
/// ```
/// use bookstore_domain::value_object::Price;
///
/// let p = Price::from_decimal("purchase_price", 12.499).unwrap();
/// assert_eq!(p.cents(), 1250);
/// assert_eq!(p.to_string(), "12.50");
/// ```
#[value_object]
#[derive(Copy, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// f64 仍能精确表示到分的最大金额（2^53 分）
    pub const MAX_CENTS: i64 = 1 << 53;

    /// 由十进制金额创建，四舍五入到两位小数
    pub fn from_decimal(field: &'static str, amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidValue {
                field,
                reason: format!("{amount} is not a finite amount"),
            });
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > Self::MAX_CENTS as f64 {
            return Err(DomainError::InvalidValue {
                field,
                reason: format!("{amount} exceeds the largest supported amount"),
            });
        }
        let price = Self(cents as i64);
        price.validate().map_err(|reason| DomainError::InvalidValue { field, reason })?;
        Ok(price)
    }

    /// 解析文本金额
    pub fn parse(field: &'static str, raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        let amount: f64 = raw
            .parse()
            .map_err(|e| DomainError::conversion(field, raw, e))?;
        Self::from_decimal(field, amount)
    }

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl ValueObject for Price {
    type Error = String;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0 < 0 {
            return Err(format!("{self} must not be negative"));
        }
        Ok(())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
