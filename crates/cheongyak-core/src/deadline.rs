//! Reception deadline ("D-day") status for a listing.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Days over which the countdown progress bar fills up.
const PROGRESS_WINDOW_DAYS: f64 = 30.0;

/// Whether the reception period is still open, as of a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Deadline {
    /// Reception is still open; whole days remain until the end date.
    Open { days_left: i64 },
    /// The reception end date has passed.
    Closed,
    /// The listing has no readable reception end date.
    Unknown,
}

impl Deadline {
    /// Evaluate the reception end against `now`. Days are truncated toward zero,
    /// so less than a full day left is `D-0`.
    pub fn evaluate(now: NaiveDateTime, reception_end: Option<NaiveDateTime>) -> Self {
        match reception_end {
            None => Deadline::Unknown,
            Some(end) if end < now => Deadline::Closed,
            Some(end) => Deadline::Open {
                days_left: (end - now).num_days(),
            },
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Deadline::Closed)
    }

    pub fn days_left(&self) -> Option<i64> {
        match self {
            Deadline::Open { days_left } => Some(*days_left),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Deadline::Open { days_left } => format!("D-{} 남았습니다", days_left),
            Deadline::Closed => "청약이 종료되었습니다".to_string(),
            Deadline::Unknown => "일정 미정".to_string(),
        }
    }

    /// Fill of the countdown bar in percent, `0.0..=100.0`.
    pub fn progress_percent(&self) -> f64 {
        match self {
            Deadline::Closed => 100.0,
            Deadline::Open { days_left } => {
                (100.0 - (*days_left as f64 / PROGRESS_WINDOW_DAYS) * 100.0).clamp(0.0, 100.0)
            }
            Deadline::Unknown => 0.0,
        }
    }

    /// Label of the "go to announcement" button.
    pub fn action_label(&self) -> &'static str {
        if self.is_closed() {
            "청약 마감됨"
        } else {
            "공고 보러가기"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::parse_date;

    fn at(date: &str) -> NaiveDateTime {
        parse_date(date).unwrap()
    }

    #[test]
    fn test_open_counts_whole_days() {
        let deadline = Deadline::evaluate(at("2025-01-15T12:00:00"), Some(at("2025-01-31")));
        assert_eq!(deadline, Deadline::Open { days_left: 15 });
        assert_eq!(deadline.label(), "D-15 남았습니다");
        assert!(!deadline.is_closed());
        assert_eq!(deadline.action_label(), "공고 보러가기");
    }

    #[test]
    fn test_same_moment_is_d_zero() {
        let deadline = Deadline::evaluate(at("2025-01-31"), Some(at("2025-01-31")));
        assert_eq!(deadline.days_left(), Some(0));
        assert_eq!(deadline.progress_percent(), 100.0);
    }

    #[test]
    fn test_closed_after_end() {
        let deadline = Deadline::evaluate(at("2025-01-31T00:00:01"), Some(at("2025-01-31")));
        assert_eq!(deadline, Deadline::Closed);
        assert_eq!(deadline.label(), "청약이 종료되었습니다");
        assert_eq!(deadline.progress_percent(), 100.0);
        assert_eq!(deadline.action_label(), "청약 마감됨");
        assert_eq!(deadline.days_left(), None);
    }

    #[test]
    fn test_unknown_without_end() {
        let deadline = Deadline::evaluate(at("2025-01-15"), None);
        assert_eq!(deadline, Deadline::Unknown);
        assert_eq!(deadline.label(), "일정 미정");
        assert_eq!(deadline.progress_percent(), 0.0);
        assert!(!deadline.is_closed());
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(Deadline::Open { days_left: 15 }.progress_percent(), 50.0);
        assert_eq!(Deadline::Open { days_left: 30 }.progress_percent(), 0.0);
        assert_eq!(Deadline::Open { days_left: 90 }.progress_percent(), 0.0);
        assert_eq!(Deadline::Open { days_left: 0 }.progress_percent(), 100.0);
    }
}
