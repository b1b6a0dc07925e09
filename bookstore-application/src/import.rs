//! 批量导入文件
//!
//! 默认格式为带表头的 CSV，每个单元格按表头字段名取值。
//! 扩展名为 `.json` 时读取 JSON 数组，每个元素是一个以字段名为键的对象：
//! 字符串原样保留，数字与布尔值转换为其文本形式，`null` 视为字段缺失。
//! 两种格式下单行格式错误都只影响该行。
//!
use std::fs;
use std::path::Path;

use bookstore_domain::factory::FieldMap;
use serde_json::Value;

use crate::error::AppError;

/// 导入文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// 按扩展名判断；`.json` 之外一律按 CSV 读取
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }
}

/// 导入文件中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRow {
    Fields(FieldMap),
    Malformed { reason: String },
}

impl From<Value> for ImportRow {
    fn from(value: Value) -> Self {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return ImportRow::Malformed {
                    reason: format!("expected an object, found {}", kind(&other)),
                };
            }
        };

        let mut fields = FieldMap::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return ImportRow::Malformed {
                        reason: format!("field '{key}' holds {}", kind(&other)),
                    };
                }
            };
            fields.insert(key, text);
        }
        ImportRow::Fields(fields)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 解析 CSV 文本；表头无法读取时整体失败
pub fn parse_csv_rows(text: &str) -> Result<Vec<ImportRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| AppError::Import(format!("invalid CSV header: {e}")))?
        .clone();

    let rows = reader
        .records()
        .map(|record| match record {
            Ok(record) => ImportRow::Fields(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            ),
            Err(e) => ImportRow::Malformed {
                reason: format!("unreadable CSV record: {e}"),
            },
        })
        .collect();
    Ok(rows)
}

/// 解析 JSON 文本；顶层不是数组时整体失败
pub fn parse_json_rows(json: &str) -> Result<Vec<ImportRow>, AppError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| AppError::Import(format!("invalid JSON: {e}")))?;
    match value {
        Value::Array(items) => Ok(items.into_iter().map(ImportRow::from).collect()),
        other => Err(AppError::Import(format!(
            "expected an array of rows, found {}",
            kind(&other)
        ))),
    }
}

/// 读取并解析导入文件，格式见 [`ImportFormat::from_path`]
pub fn load_rows(path: &Path) -> Result<Vec<ImportRow>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Import(format!("cannot read {}: {e}", path.display())))?;
    match ImportFormat::from_path(path) {
        ImportFormat::Csv => parse_csv_rows(&text),
        ImportFormat::Json => parse_json_rows(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn numbers_become_text_and_nulls_are_dropped() {
        let rows = parse_json_rows(
            r#"[{"title": "Bog", "size": 120, "selling_price": 9.5, "description": null}]"#,
        )
        .unwrap();
        let ImportRow::Fields(fields) = &rows[0] else {
            panic!("expected fields");
        };
        assert_eq!(fields["title"], "Bog");
        assert_eq!(fields["size"], "120");
        assert_eq!(fields["selling_price"], "9.5");
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn malformed_rows_are_isolated() {
        let rows = parse_json_rows(r#"[{"title": "ok"}, 42, {"tags": ["a"]}]"#).unwrap();
        assert!(matches!(rows[0], ImportRow::Fields(_)));
        assert_eq!(
            rows[1],
            ImportRow::Malformed {
                reason: "expected an object, found a number".into()
            }
        );
        assert_eq!(
            rows[2],
            ImportRow::Malformed {
                reason: "field 'tags' holds an array".into()
            }
        );
    }

    #[test]
    fn top_level_must_be_an_array() {
        assert!(matches!(
            parse_json_rows(r#"{"title": "x"}"#),
            Err(AppError::Import(_))
        ));
        assert!(matches!(parse_json_rows("not json"), Err(AppError::Import(_))));
    }

    #[test]
    fn csv_cells_are_keyed_by_header_and_trimmed() {
        let rows = parse_csv_rows(
            "title,author,description,size\n\
             Alfabet, Inger Christensen ,\"Digte, bygget på Fibonacci\",80\n\
             Det,Inger Christensen,,\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        let ImportRow::Fields(first) = &rows[0] else {
            panic!("expected fields");
        };
        assert_eq!(first["author"], "Inger Christensen");
        assert_eq!(first["description"], "Digte, bygget på Fibonacci");
        assert_eq!(first["size"], "80");

        let ImportRow::Fields(second) = &rows[1] else {
            panic!("expected fields");
        };
        assert_eq!(second["description"], "");
    }

    #[test]
    fn csv_record_with_wrong_width_is_isolated() {
        let rows = parse_csv_rows("title,stock\nAlfabet,4\nDet,1,extra\nSommerfugledalen,2\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(matches!(rows[0], ImportRow::Fields(_)));
        assert!(matches!(&rows[1], ImportRow::Malformed { reason } if reason.starts_with("unreadable CSV record")));
        assert!(matches!(rows[2], ImportRow::Fields(_)));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ImportFormat::from_path(Path::new("books.JSON")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("books_data.csv")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(Path::new("books")), ImportFormat::Csv);
    }

    #[test]
    fn load_rows_reads_csv_and_json_files() {
        let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(csv_file, "title\nFra fil\n").unwrap();
        let rows = load_rows(csv_file.path()).unwrap();
        assert_eq!(rows.len(), 1);

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json_file, r#"[{{"title": "Fra fil"}}, {{"title": "Og en til"}}]"#).unwrap();
        let rows = load_rows(json_file.path()).unwrap();
        assert_eq!(rows.len(), 2);

        let missing = load_rows(Path::new("/definitely/not/here.csv"));
        assert!(matches!(missing, Err(AppError::Import(_))));
    }
}
