//! Subscription timeline and milestone status classification.
//!
//! A listing's application timeline is made of six fixed milestones, from the
//! recruitment announcement through the contract period. Each milestone's
//! status is recomputed against the current moment every time the schedule is
//! built; nothing here is persisted.
//!
//! Absent or unparseable dates never cause an error. They compare as "not
//! after now", so `now` is never considered to be before them and the
//! classification falls through to the next branch.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{SubscriptionDetail, UNDECIDED};

/// Date-only layouts accepted from the API.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Date-time layouts accepted from the API (no offset, local time).
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Where a milestone stands relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Completed,
}

impl MilestoneStatus {
    /// Korean badge label.
    pub fn label(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "대기",
            MilestoneStatus::InProgress => "진행중",
            MilestoneStatus::Completed => "종료",
        }
    }

    /// True once the milestone has started.
    pub fn is_reached(&self) -> bool {
        !matches!(self, MilestoneStatus::Pending)
    }
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a date as sent by the API.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, compact `YYYYMMDD`, the
/// same with a time of day, and RFC 3339 timestamps (converted to local time).
/// A date without a time means local midnight at the start of that day.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    parse_compact_date(s)
}

/// `YYYYMMDD` with no separators.
fn parse_compact_date(s: &str) -> Option<NaiveDateTime> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse an optional raw date, treating anything unreadable as absent.
pub fn parse_optional_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_date)
}

/// `now` is strictly before `date`. An absent date is never after now.
fn is_before(now: NaiveDateTime, date: Option<NaiveDateTime>) -> bool {
    date.map(|d| now < d).unwrap_or(false)
}

/// Classify a milestone window against `now`.
///
/// - `Pending` while `now` is before `begin`
/// - `InProgress` while `now` is before `end`
/// - `Completed` otherwise
pub fn classify(
    now: NaiveDateTime,
    begin: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> MilestoneStatus {
    if is_before(now, begin) {
        MilestoneStatus::Pending
    } else if is_before(now, end) {
        MilestoneStatus::InProgress
    } else {
        MilestoneStatus::Completed
    }
}

/// Classify a single-date milestone. There is no in-progress state: the
/// milestone is pending until its date and completed from then on.
pub fn classify_point(now: NaiveDateTime, date: Option<NaiveDateTime>) -> MilestoneStatus {
    if is_before(now, date) {
        MilestoneStatus::Pending
    } else {
        MilestoneStatus::Completed
    }
}

/// The six milestones of a subscription timeline, in schedule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MilestoneKind {
    Announcement,
    SpecialSupply,
    FirstRankLocal,
    FirstRankOther,
    WinnerAnnouncement,
    Contract,
}

impl MilestoneKind {
    pub const ALL: [MilestoneKind; 6] = [
        MilestoneKind::Announcement,
        MilestoneKind::SpecialSupply,
        MilestoneKind::FirstRankLocal,
        MilestoneKind::FirstRankOther,
        MilestoneKind::WinnerAnnouncement,
        MilestoneKind::Contract,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            MilestoneKind::Announcement => "모집공고",
            MilestoneKind::SpecialSupply => "특별공급",
            MilestoneKind::FirstRankLocal => "1순위지역 접수",
            MilestoneKind::FirstRankOther => "1순위 기타지역 접수",
            MilestoneKind::WinnerAnnouncement => "당첨자 발표",
            MilestoneKind::Contract => "계약",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MilestoneKind::Announcement => "청약 신청 조건 및 주택 정보 확인이 가능합니다.",
            MilestoneKind::SpecialSupply => "다자녀, 신혼부부 등 특별공급 신청일입니다.",
            MilestoneKind::FirstRankLocal => "해당 지역 1순위 청약 신청일입니다.",
            MilestoneKind::FirstRankOther => "기타지역 1순위 청약 신청일입니다.",
            MilestoneKind::WinnerAnnouncement => "청약 당첨자 발표 및 동호수 배정일입니다.",
            MilestoneKind::Contract => "분양계약 체결 기간입니다.",
        }
    }

    /// Whether the milestone spans a window. The winner announcement is a single day.
    pub fn has_window(&self) -> bool {
        !matches!(self, MilestoneKind::WinnerAnnouncement)
    }

    /// Raw (begin, end) dates of this milestone on a listing.
    pub fn raw_dates<'a>(
        &self,
        subscription: &'a SubscriptionDetail,
    ) -> (Option<&'a str>, Option<&'a str>) {
        let s = subscription;
        let (begin, end) = match self {
            MilestoneKind::Announcement => (&s.reception_begin, &s.reception_end),
            MilestoneKind::SpecialSupply => (&s.special_supply_begin, &s.special_supply_end),
            MilestoneKind::FirstRankLocal => (&s.first_rank_local_begin, &s.first_rank_local_end),
            MilestoneKind::FirstRankOther => (&s.first_rank_other_begin, &s.first_rank_other_end),
            MilestoneKind::WinnerAnnouncement => return (s.winner_announcement.as_deref(), None),
            MilestoneKind::Contract => (&s.contract_begin, &s.contract_end),
        };
        (begin.as_deref(), end.as_deref())
    }
}

/// One row of the schedule tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub begin: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub status: MilestoneStatus,
}

impl Milestone {
    pub fn new(
        kind: MilestoneKind,
        begin: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Self {
        let status = if kind.has_window() {
            classify(now, begin, end)
        } else {
            classify_point(now, begin)
        };
        Self {
            kind,
            begin,
            end,
            status,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Begin date as `YYYY.MM.DD`, or `미정` when unknown.
    pub fn date_label(&self) -> String {
        match self.begin {
            Some(dt) => dt.format("%Y.%m.%d").to_string(),
            None => UNDECIDED.to_string(),
        }
    }
}

/// Build the full six-step schedule for a listing as of `now`.
pub fn build_schedule(subscription: &SubscriptionDetail, now: NaiveDateTime) -> Vec<Milestone> {
    MilestoneKind::ALL
        .iter()
        .map(|&kind| {
            let (begin, end) = kind.raw_dates(subscription);
            Milestone::new(kind, parse_optional_date(begin), parse_optional_date(end), now)
        })
        .collect()
}
