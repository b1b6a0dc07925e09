//! 目录配置
//!
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 库存下限策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// 调整后库存小于 0 时拒绝（`InsufficientStock`）
    #[default]
    RejectBelowZero,
    /// 允许负库存（例如记录预订）
    AllowNegative,
}

/// 目录运行配置
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueSettings {
    #[builder(default)]
    #[serde(default)]
    stock_policy: StockPolicy,
}

impl CatalogueSettings {
    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reject_negative_stock() {
        assert_eq!(
            CatalogueSettings::default().stock_policy(),
            StockPolicy::RejectBelowZero
        );
        assert_eq!(
            CatalogueSettings::builder().build(),
            CatalogueSettings::default()
        );
    }

    #[test]
    fn settings_deserialize_with_missing_fields() {
        let s: CatalogueSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s.stock_policy(), StockPolicy::RejectBelowZero);

        let s: CatalogueSettings =
            serde_json::from_str(r#"{"stock_policy":"allow_negative"}"#).unwrap();
        assert_eq!(s.stock_policy(), StockPolicy::AllowNegative);
    }
}
