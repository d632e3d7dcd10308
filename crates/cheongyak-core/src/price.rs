//! Price tab rows and the real-transaction chart series.

use serde::Serialize;

use crate::models::{PriceSummary, SubscriptionDetail};
use crate::utils::format_number;

/// Chart series metadata: label and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesConfig {
    pub label: &'static str,
    pub unit: &'static str,
}

/// Monthly deal count, drawn as bars on the left axis.
pub const DEAL_COUNT_SERIES: SeriesConfig = SeriesConfig {
    label: "거래건 수",
    unit: "건",
};

/// Price per pyeong, drawn as a line on the right axis.
pub const PRICE_PER_AR_SERIES: SeriesConfig = SeriesConfig {
    label: "평당 가격",
    unit: "만원",
};

/// One housing type on the price tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub housing_type: String,
    /// Exclusive area in ㎡, `-` when the matching supply row is missing.
    pub area: String,
    /// Sale price in 만원 with thousands separators.
    pub price: String,
    /// Normal plus special count of the matching supply target, else `totSuplyHshldco`.
    pub households: i64,
    pub normal_count: i64,
    pub special_count: i64,
}

/// Join each price row with the supply target sharing its id.
pub fn price_rows(subscription: &SubscriptionDetail) -> Vec<PriceRow> {
    subscription
        .price_info
        .iter()
        .map(|price| {
            let target = subscription.supply_target_for(price);
            let normal_count = target.and_then(|t| t.normal_count).unwrap_or(0);
            let special_count = target.and_then(|t| t.special_count).unwrap_or(0);
            let households = match target {
                Some(_) => normal_count.saturating_add(special_count),
                None => subscription.total_households.unwrap_or(0),
            };
            PriceRow {
                housing_type: price.housing_type.clone().unwrap_or_default(),
                area: target
                    .and_then(|t| t.supply_area.clone())
                    .unwrap_or_else(|| "-".to_string()),
                price: format_number(price.supply_price.unwrap_or(0)),
                households,
                normal_count,
                special_count,
            }
        })
        .collect()
}

/// One month on the deal chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub deal_year_month: i64,
    /// X axis tick, e.g. `03월`.
    pub month_label: String,
    pub deal_count: i64,
    pub price_per_ar: Option<f64>,
}

/// Tick label for a `yyyymm` value: the last two digits plus `월`.
pub fn month_label(deal_year_month: i64) -> String {
    let s = deal_year_month.to_string();
    let start = s.len().saturating_sub(2);
    format!("{}월", &s[start..])
}

/// Chart points sorted by month, oldest first. Rows without a month sort first.
pub fn chart_series(summaries: &[PriceSummary]) -> Vec<ChartPoint> {
    let mut sorted: Vec<&PriceSummary> = summaries.iter().collect();
    sorted.sort_by_key(|s| s.deal_year_month.unwrap_or(0));
    sorted
        .into_iter()
        .map(|s| {
            let ym = s.deal_year_month.unwrap_or(0);
            ChartPoint {
                deal_year_month: ym,
                month_label: month_label(ym),
                deal_count: s.deal_count.unwrap_or(0),
                price_per_ar: s.price_per_ar,
            }
        })
        .collect()
}
