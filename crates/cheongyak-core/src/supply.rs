//! Special supply (특별공급) quota aggregation.
//!
//! A listing reports its special supply quotas per housing type. The detail
//! view only shows listing-wide totals, so every named counter is summed across
//! all rows. Missing counts are zero; the sum is order-independent.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::models::SupplyTargetRecord;

/// Listing-wide special supply totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SupplySummary {
    #[serde(rename = "supplyCountMultichild")]
    pub multichild: i64,
    #[serde(rename = "supplyCountNewlywed")]
    pub newlywed: i64,
    #[serde(rename = "supplyCountFirst")]
    pub first_time: i64,
    #[serde(rename = "supplyCountYouth")]
    pub youth: i64,
    #[serde(rename = "supplyCountElderly")]
    pub elderly: i64,
    #[serde(rename = "supplyCountNewborn")]
    pub newborn: i64,
    #[serde(rename = "supplyCountInstitution")]
    pub institution: i64,
    #[serde(rename = "supplyCountTransfer")]
    pub transfer: i64,
    #[serde(rename = "supplyCountOther")]
    pub other: i64,
    #[serde(rename = "supplyCountTotal")]
    pub total: i64,
}

/// Special supply quota categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SupplyCategory {
    Multichild,
    Newlywed,
    FirstTime,
    Youth,
    Elderly,
    Newborn,
    Institution,
    Transfer,
    Other,
}

impl SupplyCategory {
    pub const ALL: [SupplyCategory; 9] = [
        SupplyCategory::Multichild,
        SupplyCategory::Newlywed,
        SupplyCategory::FirstTime,
        SupplyCategory::Youth,
        SupplyCategory::Elderly,
        SupplyCategory::Newborn,
        SupplyCategory::Institution,
        SupplyCategory::Transfer,
        SupplyCategory::Other,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SupplyCategory::Multichild => "다자녀가구",
            SupplyCategory::Newlywed => "신혼부부",
            SupplyCategory::FirstTime => "생애최초",
            SupplyCategory::Youth => "청년",
            SupplyCategory::Elderly => "노인",
            SupplyCategory::Newborn => "신생아",
            SupplyCategory::Institution => "기관추천",
            SupplyCategory::Transfer => "이전기관",
            SupplyCategory::Other => "기타",
        }
    }
}

/// One tile of the special supply tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SupplyCategoryCount {
    pub category: SupplyCategory,
    pub count: i64,
}

impl SupplyCategoryCount {
    pub fn title(&self) -> &'static str {
        self.category.title()
    }
}

impl SupplySummary {
    pub fn count(&self, category: SupplyCategory) -> i64 {
        match category {
            SupplyCategory::Multichild => self.multichild,
            SupplyCategory::Newlywed => self.newlywed,
            SupplyCategory::FirstTime => self.first_time,
            SupplyCategory::Youth => self.youth,
            SupplyCategory::Elderly => self.elderly,
            SupplyCategory::Newborn => self.newborn,
            SupplyCategory::Institution => self.institution,
            SupplyCategory::Transfer => self.transfer,
            SupplyCategory::Other => self.other,
        }
    }

    /// All nine categories in display order, zeros included.
    pub fn categories(&self) -> Vec<SupplyCategoryCount> {
        SupplyCategory::ALL
            .iter()
            .map(|&category| SupplyCategoryCount {
                category,
                count: self.count(category),
            })
            .collect()
    }

    /// Categories worth a tile: counts of zero or less are hidden.
    pub fn visible_categories(&self) -> Vec<SupplyCategoryCount> {
        self.categories().into_iter().filter(|c| c.count > 0).collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == SupplySummary::default()
    }
}

impl AddAssign<&SupplyTargetRecord> for SupplySummary {
    /// Counters saturate at `i64::MAX` instead of overflowing.
    fn add_assign(&mut self, record: &SupplyTargetRecord) {
        let add = |acc: &mut i64, v: Option<i64>| *acc = acc.saturating_add(v.unwrap_or(0));
        add(&mut self.multichild, record.multichild);
        add(&mut self.newlywed, record.newlywed);
        add(&mut self.first_time, record.first_time);
        add(&mut self.youth, record.youth);
        add(&mut self.elderly, record.elderly);
        add(&mut self.newborn, record.newborn);
        add(&mut self.institution, record.institution_recommend);
        add(&mut self.transfer, record.previous_institution);
        add(&mut self.other, record.others);
        add(&mut self.total, record.total);
    }
}

/// Sum every named counter across `records`. Empty input yields all zeros.
pub fn aggregate<'a, I>(records: I) -> SupplySummary
where
    I: IntoIterator<Item = &'a SupplyTargetRecord>,
{
    records
        .into_iter()
        .fold(SupplySummary::default(), |mut acc, record| {
            acc += record;
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn youth(count: i64) -> SupplyTargetRecord {
        SupplyTargetRecord {
            youth: Some(count),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let records: Vec<SupplyTargetRecord> = Vec::new();
        let summary = aggregate(&records);
        assert_eq!(summary, SupplySummary::default());
        assert!(summary.is_empty());
        assert!(summary.visible_categories().is_empty());
    }

    #[test]
    fn test_aggregate_treats_missing_as_zero() {
        let records = vec![
            youth(10),
            SupplyTargetRecord {
                youth: Some(5),
                elderly: Some(2),
                ..Default::default()
            },
        ];

        let summary = aggregate(&records);
        assert_eq!(summary.youth, 15);
        assert_eq!(summary.elderly, 2);
        assert_eq!(
            SupplySummary {
                youth: 0,
                elderly: 0,
                ..summary
            },
            SupplySummary::default()
        );
    }

    #[test]
    fn test_aggregate_maps_renamed_fields() {
        let record = SupplyTargetRecord {
            institution_recommend: Some(3),
            previous_institution: Some(4),
            others: Some(1),
            total: Some(8),
            ..Default::default()
        };
        let summary = aggregate([&record, &record]);
        assert_eq!(summary.institution, 6);
        assert_eq!(summary.transfer, 8);
        assert_eq!(summary.other, 2);
        assert_eq!(summary.total, 16);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let records = vec![
            SupplyTargetRecord {
                multichild: Some(7),
                newlywed: Some(11),
                ..Default::default()
            },
            youth(3),
            SupplyTargetRecord {
                newborn: Some(2),
                first_time: Some(9),
                newlywed: None,
                ..Default::default()
            },
        ];
        let forward = aggregate(&records);
        let backward = aggregate(records.iter().rev());
        assert_eq!(forward, backward);
        assert_eq!(forward.newlywed, 11);
        assert_eq!(forward.first_time, 9);
    }

    #[test]
    fn test_aggregate_from_api_json() {
        let json = r#"[
            {"supplyCountYouth": 10, "supplyCountTotal": "10"},
            {"supplyCountYouth": "5", "supplyCountElderly": 2, "supplyCountNewborn": "oops"}
        ]"#;
        let records: Vec<SupplyTargetRecord> = serde_json::from_str(json).unwrap();
        let summary = aggregate(&records);
        assert_eq!(summary.youth, 15);
        assert_eq!(summary.elderly, 2);
        assert_eq!(summary.newborn, 0);
        assert_eq!(summary.total, 10);
    }

    #[test]
    fn test_aggregate_saturates_huge_counts() {
        let json = r#"[
            {"supplyCountTotal": 1e300, "supplyCountYouth": "9223372036854775807"},
            {"supplyCountTotal": 5, "supplyCountYouth": 1, "supplyCountElderly": 3}
        ]"#;
        let records: Vec<SupplyTargetRecord> = serde_json::from_str(json).unwrap();
        let summary = aggregate(&records);
        assert_eq!(summary.total, i64::MAX);
        assert_eq!(summary.youth, i64::MAX);
        assert_eq!(summary.elderly, 3);
    }

    #[test]
    fn test_categories_order_and_titles() {
        let titles: Vec<&str> = SupplySummary::default()
            .categories()
            .iter()
            .map(|c| c.title())
            .collect();
        assert_eq!(
            titles,
            vec!["다자녀가구", "신혼부부", "생애최초", "청년", "노인", "신생아", "기관추천", "이전기관", "기타"]
        );
    }

    #[test]
    fn test_visible_categories_hide_zero_and_negative() {
        let summary = SupplySummary {
            newlywed: 12,
            youth: -1,
            other: 3,
            total: 15,
            ..Default::default()
        };
        let visible = summary.visible_categories();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].category, SupplyCategory::Newlywed);
        assert_eq!(visible[1].title(), "기타");
    }

    #[test]
    fn test_summary_serializes_with_api_names() {
        let summary = aggregate(&[youth(4)]);
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["supplyCountYouth"], 4);
        assert_eq!(json["supplyCountTransfer"], 0);
    }
}
