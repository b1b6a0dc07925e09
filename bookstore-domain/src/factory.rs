//! 图书工厂（BookFactory）
//!
//! 负责两条录入路径：
//! - 手工录入：[`BookFactory::validate`] 对不可信的文本做完整校验（必填、枚举、数值）；
//! - 批量导入：[`BookFactory::from_row`] 面向已成形的数据，只做数值强制转换。
//!
//! 两条路径最终都经 [`BookFactory::construct`] 分配 ID 并实例化对应载体，
//! 再提交给 [`Catalogue::add`] 做重复检查。
//!
use std::collections::BTreeMap;

use bon::Builder;
use tracing::debug;

use crate::book::{BookFormat, BookId, BookRecord};
use crate::catalogue::{AddOutcome, Catalogue};
use crate::error::{DomainError, DomainResult};
use crate::value_object::{Audience, CanonicalValue, Category, Medium, Price};

/// 以字段名为键的原始录入数据
pub type FieldMap = BTreeMap<String, String>;

/// 录入必需的字段（按校验顺序）
pub const REQUIRED_FIELDS: [&str; 10] = [
    "title",
    "author",
    "description",
    "category",
    "medium",
    "audience",
    "size",
    "purchase_price",
    "selling_price",
    "stock",
];

/// 通过校验、可直接实例化的字段集合
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(on(String, into))]
pub struct ValidatedFields {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: Category,
    pub medium: Medium,
    pub audience: Audience,
    pub size: u32,
    pub purchase_price: Price,
    pub selling_price: Price,
    pub stock: i64,
}

/// 单调递增的 ID 分配器，从 1 开始，不回收
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一个将被分配的 ID（不消耗）
    pub fn peek(&self) -> BookId {
        BookId::new(self.next)
    }

    pub fn allocate(&mut self) -> BookId {
        let id = BookId::new(self.next);
        self.next += 1;
        id
    }
}

/// 图书工厂，持有 ID 计数器
#[derive(Debug, Clone, Default)]
pub struct BookFactory {
    ids: IdAllocator,
}

impl BookFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定分配器创建（例如从已有编号继续）
    pub fn with_allocator(ids: IdAllocator) -> Self {
        Self { ids }
    }

    pub fn next_id(&self) -> BookId {
        self.ids.peek()
    }

    /// 校验手工录入的字段
    ///
    /// 所有值先去除首尾空白；任一必填字段缺失或为空即失败。
    /// 之后依次规范化分类/载体/读者并校验取值，再转换尺寸、价格与库存。
    /// 首个失败即返回，不会产生部分结果，也不会消耗 ID。
    pub fn validate(fields: &FieldMap) -> DomainResult<ValidatedFields> {
        let trimmed: BTreeMap<&str, &str> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .collect();

        for field in REQUIRED_FIELDS {
            match trimmed.get(field) {
                Some(v) if !v.is_empty() => {}
                _ => return Err(DomainError::MissingField { field }),
            }
        }
        let get = |field: &str| trimmed.get(field).copied().unwrap_or_default();

        let category = Category::parse_canonical(get("category"))?;
        let medium = Medium::parse_canonical(get("medium"))?;
        let audience = Audience::parse_canonical(get("audience"))?;

        Ok(ValidatedFields {
            title: get("title").to_string(),
            author: get("author").to_string(),
            description: get("description").to_string(),
            category,
            medium,
            audience,
            size: parse_size(get("size"))?,
            purchase_price: Price::parse("purchase_price", get("purchase_price"))?,
            selling_price: Price::parse("selling_price", get("selling_price"))?,
            stock: parse_stock(get("stock"))?,
        })
    }

    /// 批量导入行的强制转换
    ///
    /// 不做非空校验；字段缺失、数值无法转换或枚举无法识别时仅该行失败。
    pub fn coerce_row(row: &FieldMap) -> DomainResult<ValidatedFields> {
        let get = |field: &'static str| {
            row.get(field)
                .map(String::as_str)
                .ok_or(DomainError::MissingField { field })
        };

        Ok(ValidatedFields {
            title: get("title")?.trim().to_string(),
            author: get("author")?.trim().to_string(),
            description: get("description")?.trim().to_string(),
            category: Category::parse_canonical(get("category")?)?,
            medium: Medium::parse_canonical(get("medium")?)?,
            audience: Audience::parse_canonical(get("audience")?)?,
            size: parse_size(get("size")?)?,
            purchase_price: Price::parse("purchase_price", get("purchase_price")?)?,
            selling_price: Price::parse("selling_price", get("selling_price")?)?,
            stock: parse_stock(get("stock")?)?,
        })
    }

    /// 分配下一个 ID，并按载体实例化记录
    pub fn construct(&mut self, fields: ValidatedFields) -> BookRecord {
        let id = self.ids.allocate();
        debug!(book_id = %id, medium = %fields.medium, "allocated book id");

        BookRecord {
            id,
            title: fields.title,
            author: fields.author,
            description: fields.description,
            category: fields.category,
            audience: fields.audience,
            format: BookFormat::new(fields.medium, fields.size),
            purchase_price: fields.purchase_price,
            selling_price: fields.selling_price,
            stock: fields.stock,
        }
    }

    /// 手工录入：校验 → 构造 → 加入目录
    pub fn handle_new_book_input(
        &mut self,
        catalogue: &mut Catalogue,
        fields: &FieldMap,
    ) -> DomainResult<AddOutcome> {
        let validated = Self::validate(fields)?;
        Ok(catalogue.add(self.construct(validated)))
    }

    /// 批量导入：强制转换 → 构造 → 加入目录
    pub fn from_row(
        &mut self,
        catalogue: &mut Catalogue,
        row: &FieldMap,
    ) -> DomainResult<AddOutcome> {
        let coerced = Self::coerce_row(row)?;
        Ok(catalogue.add(self.construct(coerced)))
    }
}

fn parse_size(raw: &str) -> DomainResult<u32> {
    let raw = raw.trim();
    let size: i64 = raw
        .parse()
        .map_err(|e| DomainError::conversion("size", raw, e))?;
    u32::try_from(size).map_err(|_| DomainError::InvalidValue {
        field: "size",
        reason: format!("{size} is out of range"),
    })
}

fn parse_stock(raw: &str) -> DomainResult<i64> {
    let raw = raw.trim();
    let stock: i64 = raw
        .parse()
        .map_err(|e| DomainError::conversion("stock", raw, e))?;
    if stock < 0 {
        return Err(DomainError::InvalidValue {
            field: "stock",
            reason: format!("{stock} must not be negative"),
        });
    }
    Ok(stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn manual_input() -> FieldMap {
        fields(&[
            ("title", "  Noget der hjælper "),
            ("author", "Mona Høvring"),
            ("description", "En bog om livet"),
            ("category", "fiction"),
            ("medium", "printed"),
            ("audience", "ADULTS"),
            ("size", "190"),
            ("purchase_price", "8.994"),
            ("selling_price", "15.99"),
            ("stock", " 50 "),
        ])
    }

    #[test]
    fn validate_trims_and_canonicalizes() {
        let v = BookFactory::validate(&manual_input()).unwrap();
        assert_eq!(
            v,
            ValidatedFields::builder()
                .title("Noget der hjælper")
                .author("Mona Høvring")
                .description("En bog om livet")
                .category(Category::Fiction)
                .medium(Medium::Printed)
                .audience(Audience::Adults)
                .size(190)
                .purchase_price(Price::from_cents(899))
                .selling_price(Price::from_cents(1599))
                .stock(50)
                .build()
        );
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut input = manual_input();
        input.remove("description");
        input.insert("stock".into(), "   ".into());
        assert_eq!(
            BookFactory::validate(&input),
            Err(DomainError::MissingField {
                field: "description"
            })
        );
    }

    #[test]
    fn validate_rejects_unknown_enum_values() {
        let mut input = manual_input();
        input.insert("audience".into(), "pensioners".into());
        match BookFactory::validate(&input).unwrap_err() {
            DomainError::InvalidEnumValue { field, value, .. } => {
                assert_eq!(field, "audience");
                assert_eq!(value, "pensioners");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_numeric_values() {
        for (field, bad) in [("size", "long"), ("stock", "4.5"), ("selling_price", "free")] {
            let mut input = manual_input();
            input.insert(field.into(), bad.into());
            match BookFactory::validate(&input).unwrap_err() {
                DomainError::Conversion { field: f, value, .. } => {
                    assert_eq!(f, field);
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn validate_rejects_negative_numbers() {
        let mut input = manual_input();
        input.insert("stock".into(), "-1".into());
        assert!(matches!(
            BookFactory::validate(&input),
            Err(DomainError::InvalidValue { field: "stock", .. })
        ));

        let mut input = manual_input();
        input.insert("size".into(), "-10".into());
        assert!(matches!(
            BookFactory::validate(&input),
            Err(DomainError::InvalidValue { field: "size", .. })
        ));
    }

    #[test]
    fn construct_allocates_increasing_ids() {
        let mut factory = BookFactory::new();
        let validated = BookFactory::validate(&manual_input()).unwrap();

        let first = factory.construct(validated.clone());
        let second = factory.construct(validated);
        assert_eq!(*first.id(), BookId::new(1));
        assert_eq!(*second.id(), BookId::new(2));
        assert_eq!(factory.next_id(), BookId::new(3));
    }

    #[test]
    fn construct_dispatches_on_medium() {
        let mut factory = BookFactory::new();
        let mut validated = BookFactory::validate(&manual_input()).unwrap();
        validated.medium = Medium::EBook;

        let book = factory.construct(validated);
        assert_eq!(book.format(), BookFormat::EBook { kilobytes: 190 });
        assert!(book.display_size().contains("190 KB"));
    }

    #[test]
    fn failed_validation_does_not_consume_an_id() {
        let mut factory = BookFactory::new();
        let mut catalogue = Catalogue::new();

        let mut bad = manual_input();
        bad.insert("medium".into(), "Vinyl".into());
        assert!(matches!(
            factory.handle_new_book_input(&mut catalogue, &bad),
            Err(DomainError::InvalidEnumValue { field: "medium", .. })
        ));
        assert!(catalogue.is_empty());

        let outcome = factory
            .handle_new_book_input(&mut catalogue, &manual_input())
            .unwrap();
        assert_eq!(outcome, AddOutcome::Added(BookId::new(1)));
    }

    #[test]
    fn oversized_price_is_rejected_before_construction() {
        let mut factory = BookFactory::new();
        let mut catalogue = Catalogue::new();

        let mut huge = manual_input();
        huge.insert("purchase_price".into(), "1e30".into());
        assert!(matches!(
            factory.handle_new_book_input(&mut catalogue, &huge),
            Err(DomainError::InvalidValue {
                field: "purchase_price",
                ..
            })
        ));
        assert!(matches!(
            factory.from_row(&mut catalogue, &huge),
            Err(DomainError::InvalidValue { .. })
        ));
        assert!(catalogue.is_empty());
        assert_eq!(factory.next_id(), BookId::new(1));
    }

    #[test]
    fn from_row_coerces_trusted_input() {
        let mut factory = BookFactory::with_allocator(IdAllocator::new());
        let mut catalogue = Catalogue::new();
        let row = fields(&[
            ("title", "Lydbog"),
            ("author", "A. Forfatter"),
            ("description", ""),
            ("category", "Non-fiction"),
            ("medium", "Audiobook"),
            ("audience", "Children"),
            ("size", "95"),
            ("purchase_price", "4.5"),
            ("selling_price", "9"),
            ("stock", "3"),
        ]);

        let outcome = factory.from_row(&mut catalogue, &row).unwrap();
        assert_eq!(outcome, AddOutcome::Added(BookId::new(1)));

        let book = catalogue.get(BookId::new(1)).unwrap();
        assert_eq!(book.description(), "");
        assert_eq!(book.purchase_price().cents(), 450);
        assert_eq!(book.selling_price().to_string(), "9.00");
        assert_eq!(book.format(), BookFormat::Audiobook { minutes: 95 });
    }

    #[test]
    fn from_row_failure_affects_only_that_row() {
        let mut factory = BookFactory::new();
        let mut catalogue = Catalogue::new();
        let mut row = fields(&[
            ("title", "Row"),
            ("author", "Writer"),
            ("description", "d"),
            ("category", "Fiction"),
            ("medium", "Printed"),
            ("audience", "Adults"),
            ("size", "100"),
            ("purchase_price", "1"),
            ("selling_price", "2"),
            ("stock", "many"),
        ]);

        assert!(matches!(
            factory.from_row(&mut catalogue, &row),
            Err(DomainError::Conversion { field: "stock", .. })
        ));
        row.remove("author");
        assert_eq!(
            factory.from_row(&mut catalogue, &row),
            Err(DomainError::MissingField { field: "author" })
        );
        assert!(catalogue.is_empty());
        assert_eq!(factory.next_id(), BookId::new(1));
    }
}
