//! View model for the subscription detail page.
//!
//! `SubscriptionDetailView::build` derives everything the detail page shows
//! from already-fetched data: it performs no I/O and can be rebuilt whenever
//! any input changes.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::models::{Infra, PriceSummary, SchoolOwnership, SubscriptionDetail};
use crate::price::{chart_series, price_rows, ChartPoint, PriceRow};
use crate::supply::{aggregate, SupplySummary};
use crate::timeline::{build_schedule, parse_optional_date, Milestone};
use crate::utils::format_date;

// ============================================================================
// Tabs
// ============================================================================

/// Tabs of the detail page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum DetailTab {
    #[default]
    Common,
    Price,
    Chart,
    Special,
    Schedule,
}

impl DetailTab {
    pub const ALL: [DetailTab; 5] = [
        DetailTab::Common,
        DetailTab::Price,
        DetailTab::Chart,
        DetailTab::Special,
        DetailTab::Schedule,
    ];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            DetailTab::Common => "기본정보",
            DetailTab::Price => "가격정보",
            DetailTab::Chart => "실거래가 차트",
            DetailTab::Special => "특별공급",
            DetailTab::Schedule => "전체일정",
        }
    }

    /// Identifier used in URLs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailTab::Common => "common",
            DetailTab::Price => "price",
            DetailTab::Chart => "chart",
            DetailTab::Special => "special",
            DetailTab::Schedule => "schedule",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            DetailTab::Common => DetailTab::Price,
            DetailTab::Price => DetailTab::Chart,
            DetailTab::Chart => DetailTab::Special,
            DetailTab::Special => DetailTab::Schedule,
            DetailTab::Schedule => DetailTab::Common,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            DetailTab::Common => DetailTab::Schedule,
            DetailTab::Price => DetailTab::Common,
            DetailTab::Chart => DetailTab::Price,
            DetailTab::Special => DetailTab::Chart,
            DetailTab::Schedule => DetailTab::Special,
        }
    }
}

impl fmt::Display for DetailTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl fmt::Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tab '{}' (expected common, price, chart, special or schedule)",
            self.0
        )
    }
}

impl std::error::Error for UnknownTab {}

impl FromStr for DetailTab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DetailTab::ALL
            .iter()
            .copied()
            .find(|tab| tab.as_str() == wanted)
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

// ============================================================================
// Like (관심 청약)
// ============================================================================

/// What pressing the bookmark button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    pub fn for_state(is_liked: bool) -> Self {
        if is_liked {
            LikeAction::Unlike
        } else {
            LikeAction::Like
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LikeAction::Like => "관심 청약 등록",
            LikeAction::Unlike => "관심 청약 해제",
        }
    }
}

// ============================================================================
// View Model
// ============================================================================

/// Household counts shown on the supply card and the common tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyOverview {
    pub total: i64,
    pub normal: i64,
    pub special: i64,
    pub move_in_month: String,
    pub developer: String,
    pub constructor: String,
    pub rent_type: String,
    pub house_detail_type: String,
}

impl SupplyOverview {
    pub fn from_subscription(subscription: &SubscriptionDetail) -> Self {
        let text = |s: &Option<String>| s.clone().unwrap_or_default();
        Self {
            total: subscription.total_supply_count.unwrap_or(0),
            normal: subscription.normal_supply_count.unwrap_or(0),
            special: subscription.special_supply_count.unwrap_or(0),
            move_in_month: subscription.move_in_month().to_string(),
            developer: text(&subscription.developer),
            constructor: text(&subscription.constructor),
            rent_type: text(&subscription.rent_type_name),
            house_detail_type: text(&subscription.house_detail_type_name),
        }
    }
}

/// A nearby school or station line on the common tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfraEntry {
    /// Badge text: school ownership or subway line.
    pub badge: String,
    pub name: String,
    pub distance: Option<String>,
}

/// Nearby infrastructure ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfraView {
    pub schools: Vec<InfraEntry>,
    pub stations: Vec<InfraEntry>,
}

impl InfraView {
    pub fn from_infra(infra: &Infra) -> Self {
        let schools = infra
            .schools
            .iter()
            .map(|s| InfraEntry {
                badge: match s.ownership() {
                    SchoolOwnership::Public => "공립".to_string(),
                    SchoolOwnership::Private => "사립".to_string(),
                    SchoolOwnership::Other => s.school_type.clone().unwrap_or_default(),
                },
                name: s.name.clone().unwrap_or_default(),
                distance: s.distance.clone(),
            })
            .collect();
        let stations = infra
            .stations
            .iter()
            .map(|s| InfraEntry {
                badge: s.line.clone().unwrap_or_default(),
                name: s.name.clone().unwrap_or_default(),
                distance: s.distance.clone(),
            })
            .collect();
        Self { schools, stations }
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty() && self.stations.is_empty()
    }
}

/// Everything the detail page renders, derived at one instant.
#[derive(Debug, Clone)]
pub struct SubscriptionDetailView {
    pub name: String,
    pub address: String,
    pub announcement_url: Option<String>,
    /// `YYYY.MM.DD ~ YYYY.MM.DD`
    pub reception_period: String,
    pub deadline: Deadline,
    pub like_action: LikeAction,
    pub overview: SupplyOverview,
    pub schedule: Vec<Milestone>,
    pub special_supply: SupplySummary,
    pub price_rows: Vec<PriceRow>,
    pub chart: Vec<ChartPoint>,
    pub infra: InfraView,
    pub coordinates: Option<(f64, f64)>,
}

impl SubscriptionDetailView {
    pub fn build(
        subscription: &SubscriptionDetail,
        infra: Option<&Infra>,
        price_summaries: &[PriceSummary],
        is_liked: bool,
        now: NaiveDateTime,
    ) -> Self {
        let reception_end = parse_optional_date(subscription.reception_end.as_deref());
        Self {
            name: subscription.display_name().trim().to_string(),
            address: subscription.display_address().to_string(),
            announcement_url: subscription.announcement_url.clone(),
            reception_period: format!(
                "{} ~ {}",
                format_date(subscription.reception_begin.as_deref()),
                format_date(subscription.reception_end.as_deref())
            ),
            deadline: Deadline::evaluate(now, reception_end),
            like_action: LikeAction::for_state(is_liked),
            overview: SupplyOverview::from_subscription(subscription),
            schedule: build_schedule(subscription, now),
            special_supply: aggregate(&subscription.special_supply_targets),
            price_rows: price_rows(subscription),
            chart: chart_series(price_summaries),
            infra: infra.map(InfraView::from_infra).unwrap_or_default(),
            coordinates: subscription.coordinates(),
        }
    }

    /// Whether the announcement link should be offered.
    pub fn can_open_announcement(&self) -> bool {
        !self.deadline.is_closed() && self.announcement_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{School, Station, SupplyTargetRecord};
    use crate::timeline::{parse_date, MilestoneStatus};

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(DetailTab::Common.next(), DetailTab::Price);
        assert_eq!(DetailTab::Price.next(), DetailTab::Chart);
        assert_eq!(DetailTab::Chart.next(), DetailTab::Special);
        assert_eq!(DetailTab::Special.next(), DetailTab::Schedule);
        assert_eq!(DetailTab::Schedule.next(), DetailTab::Common); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(DetailTab::Common.prev(), DetailTab::Schedule); // Wraps around
        assert_eq!(DetailTab::Schedule.prev(), DetailTab::Special);
        assert_eq!(DetailTab::Special.prev(), DetailTab::Chart);
        assert_eq!(DetailTab::Chart.prev(), DetailTab::Price);
        assert_eq!(DetailTab::Price.prev(), DetailTab::Common);
    }

    #[test]
    fn test_tab_from_str() {
        assert_eq!("common".parse::<DetailTab>(), Ok(DetailTab::Common));
        assert_eq!("Schedule".parse::<DetailTab>(), Ok(DetailTab::Schedule));
        assert_eq!(" chart ".parse::<DetailTab>(), Ok(DetailTab::Chart));
        assert!("calendar".parse::<DetailTab>().is_err());
        assert_eq!(DetailTab::default(), DetailTab::Common);
    }

    #[test]
    fn test_tab_round_trip_identifiers() {
        for tab in DetailTab::ALL {
            assert_eq!(tab.as_str().parse::<DetailTab>(), Ok(tab));
        }
        assert_eq!(serde_json::to_string(&DetailTab::Special).unwrap(), "\"special\"");
        assert_eq!(DetailTab::Chart.to_string(), "실거래가 차트");
    }

    // -------------------------------------------------------------------------
    // Like Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_like_action() {
        assert_eq!(LikeAction::for_state(true), LikeAction::Unlike);
        assert_eq!(LikeAction::for_state(false), LikeAction::Like);
        assert_eq!(LikeAction::Unlike.label(), "관심 청약 해제");
        assert_eq!(LikeAction::Like.label(), "관심 청약 등록");
    }

    // -------------------------------------------------------------------------
    // View Tests
    // -------------------------------------------------------------------------

    fn sample_subscription() -> SubscriptionDetail {
        SubscriptionDetail {
            house_name: Some("힐스테이트 검단 ".to_string()),
            supply_address: Some("인천광역시 서구 당하동".to_string()),
            announcement_url: Some("https://example.com/notice/1".to_string()),
            reception_begin: Some("2025-01-01".to_string()),
            reception_end: Some("2025-01-31".to_string()),
            winner_announcement: Some("2025-02-10".to_string()),
            total_supply_count: Some(120),
            normal_supply_count: Some(70),
            special_supply_targets: vec![
                SupplyTargetRecord {
                    youth: Some(10),
                    ..Default::default()
                },
                SupplyTargetRecord {
                    youth: Some(5),
                    elderly: Some(2),
                    ..Default::default()
                },
            ],
            latitude: Some(37.6),
            longitude: Some(126.6),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_view_while_open() {
        let now = parse_date("2025-01-15").unwrap();
        let view = SubscriptionDetailView::build(&sample_subscription(), None, &[], false, now);

        assert_eq!(view.name, "힐스테이트 검단");
        assert_eq!(view.reception_period, "2025.01.01 ~ 2025.01.31");
        assert_eq!(view.deadline, Deadline::Open { days_left: 16 });
        assert_eq!(view.like_action, LikeAction::Like);
        assert!(view.can_open_announcement());
        assert_eq!(view.schedule[0].status, MilestoneStatus::InProgress);
        assert_eq!(view.schedule[4].status, MilestoneStatus::Pending);
        assert_eq!(view.special_supply.youth, 15);
        assert_eq!(view.special_supply.elderly, 2);
        assert_eq!(view.overview.total, 120);
        assert_eq!(view.overview.special, 0);
        assert_eq!(view.overview.move_in_month, "미정");
        assert!(view.infra.is_empty());
        assert_eq!(view.coordinates, Some((37.6, 126.6)));
    }

    #[test]
    fn test_build_view_after_close() {
        let now = parse_date("2025-02-01").unwrap();
        let view = SubscriptionDetailView::build(&sample_subscription(), None, &[], true, now);

        assert!(view.deadline.is_closed());
        assert!(!view.can_open_announcement());
        assert_eq!(view.like_action, LikeAction::Unlike);
        assert_eq!(view.schedule[0].status, MilestoneStatus::Completed);
    }

    #[test]
    fn test_build_view_with_infra_and_prices() {
        let infra = Infra {
            schools: vec![School {
                name: Some("당하초등학교".to_string()),
                school_type: Some("공립".to_string()),
                distance: Some("250".to_string()),
                ..Default::default()
            }],
            stations: vec![Station {
                name: Some("검단호수공원".to_string()),
                line: Some("인천1호선".to_string()),
                distance: Some("900".to_string()),
                ..Default::default()
            }],
        };
        let prices = vec![
            PriceSummary {
                deal_year_month: Some(202502),
                deal_count: Some(3),
                price_per_ar: Some(1500.0),
            },
            PriceSummary {
                deal_year_month: Some(202501),
                deal_count: Some(5),
                price_per_ar: Some(1480.0),
            },
        ];
        let now = parse_date("2025-01-15").unwrap();
        let view = SubscriptionDetailView::build(&sample_subscription(), Some(&infra), &prices, false, now);

        assert_eq!(view.infra.schools[0].badge, "공립");
        assert_eq!(view.infra.stations[0].badge, "인천1호선");
        assert_eq!(view.chart[0].month_label, "01월");
        assert_eq!(view.chart[1].deal_count, 3);
    }
}
