use crate::models::UNDECIDED;
use crate::timeline::parse_date;

/// Format an API date as `YYYY.MM.DD`. Unreadable or missing dates show as `미정`.
pub fn format_date(date: Option<&str>) -> String {
    match date.and_then(parse_date) {
        Some(dt) => dt.format("%Y.%m.%d").to_string(),
        None => UNDECIDED.to_string(),
    }
}

/// Format an integer with Korean-style thousands separators: `1234567` -> `1,234,567`
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a distance in metres, e.g. `(320m)`
pub fn format_distance(distance: Option<&str>) -> String {
    match distance {
        Some(d) => format!("({}m)", d),
        None => String::new(),
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2025-01-05")), "2025.01.05");
        assert_eq!(format_date(Some("20250105")), "2025.01.05");
        assert_eq!(format_date(Some("soon")), "미정");
        assert_eq!(format_date(None), "미정");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(145000), "145,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-98765), "-98,765");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Some("320")), "(320m)");
        assert_eq!(format_distance(None), "");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("래미안 원베일리", 6), "래미안...");
    }
}
