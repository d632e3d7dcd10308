//! Interest region (관심 지역) management.
//!
//! Members keep up to five `시/도 군/구` pairs; recommendations are based on
//! them. The API stores each pair as a single space-separated string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Mypage;

/// Maximum number of interest regions a member can register.
pub const MAX_INTEREST_REGIONS: usize = 5;

/// A `시/도` + `군/구` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterestRegion {
    pub city: String,
    pub district: String,
}

impl InterestRegion {
    pub fn new(city: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            district: district.into(),
        }
    }

    /// Parse `"서울특별시 강남구"`. A value without a space has an empty district;
    /// anything after the second word is ignored.
    pub fn parse(local: &str) -> Self {
        let mut parts = local.split_whitespace();
        let city = parts.next().unwrap_or("");
        let district = parts.next().unwrap_or("");
        Self::new(city, district)
    }

    /// The string form the API expects for add/delete requests.
    pub fn to_query(&self) -> String {
        format!("{} {}", self.city, self.district)
    }
}

impl fmt::Display for InterestRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query())
    }
}

/// The member's interest regions in API order. A missing list is empty.
pub fn interest_regions(mypage: Option<&Mypage>) -> Vec<InterestRegion> {
    mypage
        .and_then(|m| m.interest_locals.as_ref())
        .map(|locals| locals.iter().map(|l| InterestRegion::parse(l)).collect())
        .unwrap_or_default()
}

/// Whether another region can be registered.
pub fn can_add(current_count: usize) -> bool {
    current_count < MAX_INTEREST_REGIONS
}

/// State of the "add interest region" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionForm {
    visible: bool,
    city: Option<String>,
    district: Option<String>,
}

impl RegionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the form. Hiding keeps the current selection.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn selected_district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// Pick a 시/도. A different city invalidates the chosen district.
    pub fn select_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        if self.city.as_deref() != Some(city.as_str()) {
            self.district = None;
        }
        self.city = Some(city);
    }

    pub fn select_district(&mut self, district: impl Into<String>) {
        self.district = Some(district.into());
    }

    /// The region that would be submitted, if the form is complete and the list has room.
    pub fn submission(&self, current_count: usize) -> Option<InterestRegion> {
        if !can_add(current_count) {
            return None;
        }
        let city = self.city.as_deref().filter(|c| !c.trim().is_empty())?;
        let district = self.district.as_deref().filter(|d| !d.trim().is_empty())?;
        Some(InterestRegion::new(city.trim(), district.trim()))
    }

    /// Take the submission and close the form, leaving it untouched when incomplete.
    pub fn submit(&mut self, current_count: usize) -> Option<InterestRegion> {
        let region = self.submission(current_count)?;
        *self = Self::default();
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interest_region() {
        let region = InterestRegion::parse("서울특별시 강남구");
        assert_eq!(region, InterestRegion::new("서울특별시", "강남구"));
        assert_eq!(region.to_query(), "서울특별시 강남구");
        assert_eq!(region.to_string(), "서울특별시 강남구");
    }

    #[test]
    fn test_parse_interest_region_odd_input() {
        assert_eq!(InterestRegion::parse("세종특별자치시"), InterestRegion::new("세종특별자치시", ""));
        assert_eq!(
            InterestRegion::parse("경기도 성남시 분당구"),
            InterestRegion::new("경기도", "성남시")
        );
        assert_eq!(InterestRegion::parse(""), InterestRegion::new("", ""));
    }

    #[test]
    fn test_interest_regions_from_mypage() {
        let mypage = Mypage {
            interest_locals: Some(vec!["서울특별시 강남구".to_string(), "부산광역시 해운대구".to_string()]),
            ..Default::default()
        };
        let regions = interest_regions(Some(&mypage));
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].district, "해운대구");

        assert!(interest_regions(Some(&Mypage::default())).is_empty());
        assert!(interest_regions(None).is_empty());
    }

    #[test]
    fn test_can_add_limit() {
        assert!(can_add(0));
        assert!(can_add(4));
        assert!(!can_add(5));
        assert!(!can_add(6));
    }

    #[test]
    fn test_form_toggle() {
        let mut form = RegionForm::new();
        assert!(!form.is_visible());
        form.toggle();
        assert!(form.is_visible());
        form.toggle();
        assert!(!form.is_visible());
    }

    #[test]
    fn test_form_city_change_clears_district() {
        let mut form = RegionForm::new();
        form.select_city("서울특별시");
        form.select_district("강남구");
        form.select_city("서울특별시");
        assert_eq!(form.selected_district(), Some("강남구"));

        form.select_city("부산광역시");
        assert_eq!(form.selected_city(), Some("부산광역시"));
        assert_eq!(form.selected_district(), None);
    }

    #[test]
    fn test_form_submission() {
        let mut form = RegionForm::new();
        form.toggle();
        assert_eq!(form.submission(0), None);

        form.select_city("서울특별시");
        assert_eq!(form.submission(0), None);

        form.select_district("강남구");
        assert_eq!(form.submission(5), None);
        assert_eq!(form.submission(4), Some(InterestRegion::new("서울특별시", "강남구")));

        let submitted = form.submit(1);
        assert_eq!(submitted, Some(InterestRegion::new("서울특별시", "강남구")));
        assert!(!form.is_visible());
        assert_eq!(form.selected_city(), None);
    }

    #[test]
    fn test_incomplete_submit_keeps_form() {
        let mut form = RegionForm::new();
        form.toggle();
        form.select_city("서울특별시");
        assert_eq!(form.submit(0), None);
        assert!(form.is_visible());
        assert_eq!(form.selected_city(), Some("서울특별시"));
    }
}
