//! Subscription (청약) listing models.
//!
//! Field names follow the public housing API (`houseNm`, `rceptBgnde`, ...);
//! the Rust side uses readable names and serde renames.

use serde::{Deserialize, Serialize};

use super::de::{deserialize_count, deserialize_decimal, deserialize_string_or_number};

/// Move-in month shown when the listing doesn't announce one.
pub const UNDECIDED: &str = "미정";

/// A single subscription listing as returned by `GET /subscriptions/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionDetail {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "houseNm", default)]
    pub house_name: Option<String>,
    #[serde(rename = "hssplyAdres", default)]
    pub supply_address: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub longitude: Option<f64>,

    // Schedule
    #[serde(rename = "rceptBgnde", default, deserialize_with = "deserialize_string_or_number")]
    pub reception_begin: Option<String>,
    #[serde(rename = "rceptEndde", default, deserialize_with = "deserialize_string_or_number")]
    pub reception_end: Option<String>,
    #[serde(rename = "spsplyRceptBgnde", default, deserialize_with = "deserialize_string_or_number")]
    pub special_supply_begin: Option<String>,
    #[serde(rename = "spsplyRceptEndde", default, deserialize_with = "deserialize_string_or_number")]
    pub special_supply_end: Option<String>,
    #[serde(rename = "gnrlRnk1CrspareaRcptde", default, deserialize_with = "deserialize_string_or_number")]
    pub first_rank_local_begin: Option<String>,
    #[serde(rename = "gnrlRnk1CrspareaEndde", default, deserialize_with = "deserialize_string_or_number")]
    pub first_rank_local_end: Option<String>,
    #[serde(rename = "gnrlRnk1EtcAreaRcptde", default, deserialize_with = "deserialize_string_or_number")]
    pub first_rank_other_begin: Option<String>,
    #[serde(rename = "gnrlRnk1EtcAreaEndde", default, deserialize_with = "deserialize_string_or_number")]
    pub first_rank_other_end: Option<String>,
    #[serde(rename = "przwnerPresnatnDe", default, deserialize_with = "deserialize_string_or_number")]
    pub winner_announcement: Option<String>,
    #[serde(rename = "cntrctCnclsBgnde", default, deserialize_with = "deserialize_string_or_number")]
    pub contract_begin: Option<String>,
    #[serde(rename = "cntrctCnclsEndde", default, deserialize_with = "deserialize_string_or_number")]
    pub contract_end: Option<String>,

    #[serde(rename = "pblancUrl", default)]
    pub announcement_url: Option<String>,
    #[serde(rename = "rentSecdNm", default)]
    pub rent_type_name: Option<String>,
    #[serde(rename = "houseDtlSecdNm", default)]
    pub house_detail_type_name: Option<String>,

    // Supply overview
    #[serde(rename = "totalSupplyCountTotal", default, deserialize_with = "deserialize_count")]
    pub total_supply_count: Option<i64>,
    #[serde(rename = "totalSupplyCountNormal", default, deserialize_with = "deserialize_count")]
    pub normal_supply_count: Option<i64>,
    #[serde(rename = "totalSupplyCountSpecial", default, deserialize_with = "deserialize_count")]
    pub special_supply_count: Option<i64>,
    #[serde(rename = "totSuplyHshldco", default, deserialize_with = "deserialize_count")]
    pub total_households: Option<i64>,

    #[serde(rename = "bsnsMbyNm", default)]
    pub developer: Option<String>,
    #[serde(rename = "cnstrctEntrpsNm", default)]
    pub constructor: Option<String>,

    #[serde(rename = "priceInfo", default)]
    pub price_info: Vec<PriceInfo>,
    #[serde(rename = "supplyTarget", default)]
    pub supply_targets: Vec<SupplyTarget>,
    #[serde(rename = "specialSupplyTarget", default)]
    pub special_supply_targets: Vec<SupplyTargetRecord>,
}

impl SubscriptionDetail {
    pub fn display_name(&self) -> &str {
        self.house_name.as_deref().unwrap_or("")
    }

    pub fn display_address(&self) -> &str {
        self.supply_address.as_deref().unwrap_or("")
    }

    /// Trimmed (region, city, district) triple used to query nearby deal prices.
    pub fn price_summary_query(&self) -> (String, String, String) {
        let trimmed = |s: &Option<String>| s.as_deref().unwrap_or("").trim().to_string();
        (trimmed(&self.region), trimmed(&self.city), trimmed(&self.district))
    }

    /// Announced move-in month of the first housing type, or `미정`.
    pub fn move_in_month(&self) -> &str {
        self.price_info
            .first()
            .and_then(|p| p.move_in_month.as_deref())
            .unwrap_or(UNDECIDED)
    }

    /// Map position of the complex, when both coordinates are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// The supply target row that shares an id with the given price row.
    pub fn supply_target_for(&self, price: &PriceInfo) -> Option<&SupplyTarget> {
        let id = price.id.as_deref()?;
        self.supply_targets
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
    }
}

/// Per housing type price row (`priceInfo[]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceInfo {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "housingType", default)]
    pub housing_type: Option<String>,
    /// Sale price in units of 10,000 won (만원).
    #[serde(rename = "supplyPrice", default, deserialize_with = "deserialize_count")]
    pub supply_price: Option<i64>,
    #[serde(rename = "moveInMonth", default, deserialize_with = "deserialize_string_or_number")]
    pub move_in_month: Option<String>,
}

/// Per housing type supply row (`supplyTarget[]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplyTarget {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub id: Option<String>,
    /// Exclusive area in ㎡, kept as text to preserve the API's precision.
    #[serde(rename = "supplyArea", default, deserialize_with = "deserialize_string_or_number")]
    pub supply_area: Option<String>,
    #[serde(rename = "supplyCountNormal", default, deserialize_with = "deserialize_count")]
    pub normal_count: Option<i64>,
    #[serde(rename = "supplyCountSpecial", default, deserialize_with = "deserialize_count")]
    pub special_count: Option<i64>,
}

/// Special supply quota row for one housing type (`specialSupplyTarget[]`).
///
/// Every count is optional; absent and malformed values read as zero when aggregated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyTargetRecord {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "supplyCountMultichild", default, deserialize_with = "deserialize_count")]
    pub multichild: Option<i64>,
    #[serde(rename = "supplyCountNewlywed", default, deserialize_with = "deserialize_count")]
    pub newlywed: Option<i64>,
    #[serde(rename = "supplyCountFirst", default, deserialize_with = "deserialize_count")]
    pub first_time: Option<i64>,
    #[serde(rename = "supplyCountYouth", default, deserialize_with = "deserialize_count")]
    pub youth: Option<i64>,
    #[serde(rename = "supplyCountElderly", default, deserialize_with = "deserialize_count")]
    pub elderly: Option<i64>,
    #[serde(rename = "supplyCountNewborn", default, deserialize_with = "deserialize_count")]
    pub newborn: Option<i64>,
    #[serde(rename = "supplyCountInstitutionRecommend", default, deserialize_with = "deserialize_count")]
    pub institution_recommend: Option<i64>,
    #[serde(rename = "supplyCountPreviousInstitution", default, deserialize_with = "deserialize_count")]
    pub previous_institution: Option<i64>,
    #[serde(rename = "supplyCountOthers", default, deserialize_with = "deserialize_count")]
    pub others: Option<i64>,
    #[serde(rename = "supplyCountTotal", default, deserialize_with = "deserialize_count")]
    pub total: Option<i64>,
}
