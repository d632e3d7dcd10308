//! Real-transaction (실거래가) price summaries around a listing.

use serde::{Deserialize, Serialize};

use super::de::{deserialize_count, deserialize_decimal};

/// Monthly deal statistics for one region, as returned by the price summary endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Year and month as a `yyyymm` integer, e.g. `202501`.
    #[serde(rename = "dealYearMonth", default, deserialize_with = "deserialize_count")]
    pub deal_year_month: Option<i64>,
    #[serde(rename = "dealCount", default, deserialize_with = "deserialize_count")]
    pub deal_count: Option<i64>,
    /// Average price per pyeong in 만원.
    #[serde(rename = "pricePerAr", default, deserialize_with = "deserialize_decimal")]
    pub price_per_ar: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_summaries() {
        let json = r#"[
            {"dealYearMonth": 202502, "dealCount": 14, "pricePerAr": 6120.5},
            {"dealYearMonth": "202501", "dealCount": null, "pricePerAr": "5980"}
        ]"#;

        let summaries: Vec<PriceSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(summaries[0].deal_year_month, Some(202502));
        assert_eq!(summaries[1].deal_year_month, Some(202501));
        assert_eq!(summaries[1].deal_count, None);
        assert_eq!(summaries[1].price_per_ar, Some(5980.0));
    }
}
